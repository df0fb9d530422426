mod reference_test;
mod util_test;

use assertables::*;
use kl_testutils::*;
use rstest::*;

use super::*;
use crate::prelude::*;
