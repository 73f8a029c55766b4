use std::io;

use mockall::mock;
use rstest::fixture;

mock! {
    pub Executor {

    }

    impl crate::executor::CommandExecutor for Executor {
        fn run(&self, command_line: &str) -> io::Result<Vec<String>>;
    }
}

#[fixture]
pub fn mock_executor() -> MockExecutor {
    MockExecutor::new()
}

/// Owned output lines for a mocked command
pub fn lines(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|it| String::from(*it)).collect()
}

/// Expect exactly one command containing `needle`, answering with `output`
pub fn expect_once(mock: &mut MockExecutor, needle: &'static str, output: &[&str]) {
    let out = lines(output);
    mock.expect_run()
        .withf(move |cmd: &str| cmd.contains(needle))
        .times(1)
        .returning(move |_| Ok(out.clone()));
}

/// Expect any number of commands containing `needle`, answering with `output`
pub fn expect_any(mock: &mut MockExecutor, needle: &'static str, output: &[&str]) {
    let out = lines(output);
    mock.expect_run()
        .withf(move |cmd: &str| cmd.contains(needle))
        .returning(move |_| Ok(out.clone()));
}

/// Expect commands containing `needle` to fail to launch
pub fn expect_failure(mock: &mut MockExecutor, needle: &'static str) {
    mock.expect_run()
        .withf(move |cmd: &str| cmd.contains(needle))
        .returning(|_| Err(io::Error::new(io::ErrorKind::NotFound, "adb: no such file")));
}
