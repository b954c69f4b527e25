pub(crate) mod fakes;

use fakes::Harness;

fn harness() -> Harness {
    Harness::new()
}

mod center;
mod config;
mod routing;
