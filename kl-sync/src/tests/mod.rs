mod session_test;
mod subscribe_test;

use std::time::Duration;

use assertables::*;
use kl_testutils::*;
use rstest::*;

use super::*;

// Spin until `cond` holds, for asserting on the far side of a spawned task
async fn eventually(cond: impl Fn() -> bool) {
    for _ in 0..200 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition never became true");
}
