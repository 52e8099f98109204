pub mod tracing;

use std::fmt::{Display, Formatter};

use crate::prelude::*;

pub struct Instant(std::time::Instant);

impl Instant {
    pub fn now() -> Self {
        Self(std::time::Instant::now())
    }

    pub fn elapsed(&self) -> Elapsed {
        Elapsed(self.0.elapsed())
    }
}

pub struct Elapsed(StdDuration);

impl Display for Elapsed {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(&self::tracing::format_duration(self.0))
    }
}
