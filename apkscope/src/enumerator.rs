use crate::commands::CommandBuilder;
use crate::executor::CommandExecutor;
use crate::model::Application;

const PACKAGE_PREFIX: &str = "package:";
const APK_SUFFIX: &str = ".apk";
const APK_DELIMITER: &str = ".apk=";

/// Lists installed applications with `pm list packages -f`
pub struct ApplicationEnumerator<'a> {
    executor: &'a dyn CommandExecutor,
    commands: &'a CommandBuilder,
}

impl<'a> ApplicationEnumerator<'a> {
    pub fn new(executor: &'a dyn CommandExecutor, commands: &'a CommandBuilder) -> Self {
        Self { executor, commands }
    }

    /// Returns at most `restriction` applications in listing order, a
    /// restriction of `None` or `Some(0)` lists everything.
    pub fn list(&self, restriction: Option<usize>) -> crate::Result<Vec<Application>> {
        let cmd = self.commands.list_packages();
        log::info!("getting applications list with command: {}", cmd);
        let lines = self
            .executor
            .run(&cmd)
            .map_err(|e| crate::Error::execution("unable to get the applications list", &e))?;

        let limit = restriction.filter(|it| *it > 0);
        let mut applications = Vec::new();

        for line in lines.iter().filter(|it| !it.trim().is_empty()) {
            if limit.is_some_and(|it| applications.len() >= it) {
                break;
            }
            applications.push(parse_package_line(line)?);
        }

        Ok(applications)
    }
}

/// Parses `package:<path>.apk=<package>`
pub fn parse_package_line(line: &str) -> crate::Result<Application> {
    let trimmed = line.trim();
    let entry = trimmed.strip_prefix(PACKAGE_PREFIX).unwrap_or(trimmed);
    let (path, package) = entry
        .split_once(APK_DELIMITER)
        .ok_or_else(|| crate::Error::MalformedOutput(line.into()))?;
    if package.is_empty() || path.is_empty() {
        return Err(crate::Error::MalformedOutput(line.into()));
    }
    Ok(Application::new(format!("{}{}", path, APK_SUFFIX), package))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::{expect_failure, expect_once, mock_executor, MockExecutor};
    use rstest::*;

    const PACKAGES: &[&str] = &[
        "package:/apex/com.android.uwb/priv-app/ServiceUwbResourcesGoogle@360526040/ServiceUwbResourcesGoogle.apk=com.google.android.uwb.resources",
        "package:/product/priv-app/KidsSupervisionStub/KidsSupervisionStub.apk=com.google.android.gms.supervision",
        "package:/system/app/BookmarkProvider/BookmarkProvider.apk=com.android.bookmarkprovider",
        "package:/product/app/Camera2/Camera2.apk=com.android.camera2",
        "package:/data/app/~~Xk1b2Q==/com.example.app-9a8b7c==/base.apk=com.example.app",
    ];

    #[fixture]
    fn commands() -> CommandBuilder {
        CommandBuilder::new("adb", "emulator-5554")
    }

    #[test]
    fn test_parse_package_line() {
        let app = parse_package_line(PACKAGES[4]).unwrap();
        assert_eq!(app.path, "/data/app/~~Xk1b2Q==/com.example.app-9a8b7c==/base.apk");
        assert_eq!(app.package, "com.example.app");
        assert!(app.hashes.is_none());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(matches!(
            parse_package_line("package:com.android.shell"),
            Err(crate::Error::MalformedOutput(_))
        ));
        assert!(matches!(
            parse_package_line("package:/system/app/Foo/Foo.apk="),
            Err(crate::Error::MalformedOutput(_))
        ));
    }

    #[rstest]
    fn test_list_all(mut mock_executor: MockExecutor, commands: CommandBuilder) {
        let mut output = PACKAGES.to_vec();
        output.push("");
        expect_once(&mut mock_executor, "pm list packages -f", &output);

        let apps = ApplicationEnumerator::new(&mock_executor, &commands)
            .list(None)
            .unwrap();
        assert_eq!(apps.len(), PACKAGES.len());
        assert_eq!(apps[3].package, "com.android.camera2");
        assert_eq!(apps[3].path, "/product/app/Camera2/Camera2.apk");
        assert!(apps.iter().all(|it| it.path.ends_with(".apk")));
    }

    #[rstest]
    #[case(Some(1), 1)]
    #[case(Some(3), 3)]
    #[case(Some(50), 5)]
    #[case(Some(0), 5)]
    #[case(None, 5)]
    fn test_restriction(
        mut mock_executor: MockExecutor,
        commands: CommandBuilder,
        #[case] restriction: Option<usize>,
        #[case] expected: usize,
    ) {
        expect_once(&mut mock_executor, "pm list packages -f", PACKAGES);
        let apps = ApplicationEnumerator::new(&mock_executor, &commands)
            .list(restriction)
            .unwrap();
        assert_eq!(apps.len(), expected);
        assert_eq!(apps[0].package, "com.google.android.uwb.resources");
    }

    #[rstest]
    fn test_restriction_stops_before_malformed(
        mut mock_executor: MockExecutor,
        commands: CommandBuilder,
    ) {
        expect_once(
            &mut mock_executor,
            "pm list packages -f",
            &[PACKAGES[0], "garbage"],
        );
        let apps = ApplicationEnumerator::new(&mock_executor, &commands)
            .list(Some(1))
            .unwrap();
        assert_eq!(apps.len(), 1);
    }

    #[rstest]
    fn test_malformed_line_is_an_error(mut mock_executor: MockExecutor, commands: CommandBuilder) {
        expect_once(
            &mut mock_executor,
            "pm list packages -f",
            &[PACKAGES[0], "Error: could not access the Package Manager"],
        );
        let res = ApplicationEnumerator::new(&mock_executor, &commands).list(None);
        assert!(matches!(res, Err(crate::Error::MalformedOutput(_))));
    }

    #[rstest]
    fn test_launch_failure(mut mock_executor: MockExecutor, commands: CommandBuilder) {
        expect_failure(&mut mock_executor, "pm list packages");
        let res = ApplicationEnumerator::new(&mock_executor, &commands).list(None);
        assert!(matches!(res, Err(crate::Error::Execution(_))));
    }
}
