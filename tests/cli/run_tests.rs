//! Running the binary against a real source tree

use std::process::{Command, Stdio};
use std::time::Duration;

use crate::common::{wait_until, IndexFixture};

#[test]
fn test_binary_indexes_existing_and_new_files() {
    let fx = IndexFixture::new();
    let early = fx.add_file("early-20200202.txt", "e");

    let mut child = Command::new(env!("CARGO_BIN_EXE_dateindex"))
        .env_remove("DATEINDEX_CONFIG")
        .args(["--scan-existing"])
        .arg(fx.idx())
        .arg(fx.src())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to spawn CLI");

    let timeout = Duration::from_secs(10);
    let indexed_early = wait_until(timeout, || fx.is_linked("2020/2/early-20200202.txt", &early));

    let late = fx.add_file("late-20210303.txt", "l");
    let indexed_late = wait_until(timeout, || fx.is_linked("2021/3/late-20210303.txt", &late));

    let still_running = child.try_wait().expect("try_wait").is_none();
    let _ = child.kill();
    let _ = child.wait();

    assert!(indexed_early);
    assert!(indexed_late);
    assert!(still_running);
}
