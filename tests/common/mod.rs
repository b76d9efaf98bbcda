use assert_cmd::Command;

pub fn freewrite_cmd() -> Command {
    let mut cmd = Command::cargo_bin("freewrite").unwrap();
    cmd.env_remove("FREEWRITE_DATA_DIR");
    cmd.env_remove("FREEWRITE_LOG_FILE");
    cmd.env_remove("RUST_LOG");
    cmd
}
