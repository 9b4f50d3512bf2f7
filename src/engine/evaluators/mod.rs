pub mod conv_net;
mod material;
mod uniform;

pub use conv_net::ConvNetEvaluator;
pub use material::MaterialEvaluator;
pub use uniform::UniformEvaluator;
