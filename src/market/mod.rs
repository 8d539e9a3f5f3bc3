pub mod curves;
pub mod environment;
pub mod handle;
pub mod snapshot;
pub mod vol;

pub use curves::FlatForward;
pub use environment::MarketEnvironment;
pub use handle::{Handle, RelinkableHandle};
pub use snapshot::MarketSnapshot;
pub use vol::{BlackVolTermStructure, ConstantVol};
