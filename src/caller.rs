/// Renders a call site for the `caller` field.
pub type CallerFormatter = fn(file: &str, line: u32) -> String;

/// Full source path and line, e.g. `src/handlers/user.rs:42`.
pub fn full_caller(file: &str, line: u32) -> String {
    format!("{file}:{line}")
}

/// Immediate parent directory, file name and line, e.g. `handlers/user.rs:42`.
///
/// Paths are split on both `/` and `\` so Windows builds render the same
/// way. A bare file name is kept as is.
pub fn short_caller(file: &str, line: u32) -> String {
    let mut segments = file.rsplit(['/', '\\']);
    let name = segments.next().unwrap_or(file);
    match segments.next() {
        Some(dir) => format!("{dir}/{name}:{line}"),
        None => format!("{name}:{line}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_last_two_segments() {
        assert_eq!(short_caller("/home/ci/pkg/sub/file.ext", 42), "sub/file.ext:42");
        assert_eq!(short_caller("src/lib.rs", 7), "src/lib.rs:7");
    }

    #[test]
    fn handles_windows_separators() {
        assert_eq!(short_caller(r"C:\work\pkg\sub\file.rs", 3), "sub/file.rs:3");
    }

    #[test]
    fn bare_file_name_has_no_directory() {
        assert_eq!(short_caller("main.rs", 1), "main.rs:1");
    }

    #[test]
    fn full_caller_keeps_the_path() {
        assert_eq!(full_caller("a/b/c.rs", 9), "a/b/c.rs:9");
    }
}
