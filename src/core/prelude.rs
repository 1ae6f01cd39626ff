#[allow(unused_imports)]
pub use anyhow::{anyhow, bail, Context, Result};
#[allow(unused_imports)]
pub use itertools::Itertools;
#[allow(unused_imports)]
pub use tracing::{error, info, warn};

#[allow(unused_imports)]
pub use crate::{
    core::config::*,
    util::linalg::{Vec2, Vec2i},
};

#[allow(unused_imports)]
pub(crate) use crate::assert::*;
