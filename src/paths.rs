//! File name constants and `/`-separated path helpers.

/// Arch file looked up at the project root: `.archcheck.yml`
pub const ARCH_FILE_NAME: &str = ".archcheck.yml";
/// Manifest that declares the module path: `go.mod`
pub const MANIFEST_FILE_NAME: &str = "go.mod";
/// Working directory used when the arch file does not set `workdir`.
pub const DEFAULT_WORKDIR: &str = "./";

/// Lexically clean a `/`-separated path.
///
/// Drops empty and `.` segments and folds `..` into its parent where one exists.
/// Leading `..` segments are kept. An empty result is `"."`. Glob metacharacters
/// pass through untouched.
pub fn clean_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        ".".to_string()
    } else {
        segments.join("/")
    }
}

/// Join `path` onto the working directory and clean the result.
pub fn join_workdir(workdir: &str, path: &str) -> String {
    clean_path(&format!("{}/{}", workdir, path))
}

/// Join a component pattern onto the working directory.
///
/// A trailing `/` on the pattern means "this directory and everything below it".
pub fn join_pattern(workdir: &str, pattern: &str) -> String {
    let joined = join_workdir(workdir, pattern);
    if !pattern.ends_with('/') {
        return joined;
    }

    if joined == "." {
        "**".to_string()
    } else {
        format!("{}/**", joined)
    }
}

/// Containing directory of a cleaned relative path. Top-level entries live
/// in `"."`.
pub fn parent_dir(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) => &path[..idx],
        None => ".",
    }
}

/// True when `path` is `dir` itself or lies somewhere below it.
pub fn is_within(path: &str, dir: &str) -> bool {
    if dir == "." {
        return true;
    }
    path == dir
        || path
            .strip_prefix(dir)
            .is_some_and(|rest| rest.starts_with('/'))
}
