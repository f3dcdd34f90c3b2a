mod echo;
mod responses;

pub use echo::EchoProvider;
pub use responses::ResponsesProvider;
