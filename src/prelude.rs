pub use std::time::Duration as StdDuration;

pub use anyhow::{anyhow, bail, ensure, Context};
pub use itertools::Itertools;
pub use tracing::{debug, info, instrument, warn};

pub type Result<T = (), E = anyhow::Error> = std::result::Result<T, E>;
