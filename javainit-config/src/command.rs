//! Turn an effective [`LaunchDescriptor`] into a concrete command line.
//!
//! [`build`] is pure: the supervisor's environment and working directory are
//! passed in through [`LaunchContext`] instead of being read here.

use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::PathBuf;

use crate::types::LaunchDescriptor;

/// Placeholder replaced with the resolved working directory.
pub const CWD_TOKEN: &str = "{{CWD}}";

#[cfg(unix)]
const CLASSPATH_SEPARATOR: &str = ":";
#[cfg(not(unix))]
const CLASSPATH_SEPARATOR: &str = ";";

/// Environment and working directory of the invoking supervisor process.
///
/// The environment is kept as raw OS strings; variables that are not valid
/// UTF-8 are passed through to the child untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchContext {
    pub env: BTreeMap<OsString, OsString>,
    pub cwd: PathBuf,
}

impl LaunchContext {
    /// Snapshot the current process environment.
    pub fn from_process(cwd: PathBuf) -> Self {
        Self {
            env: std::env::vars_os().collect(),
            cwd,
        }
    }
}

/// Everything needed to spawn the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchCommand {
    pub executable: PathBuf,
    pub args: Vec<String>,
    pub env: BTreeMap<OsString, OsString>,
    pub working_dir: PathBuf,
    /// The Java home the executable was resolved from, if any.
    pub java_home: Option<PathBuf>,
}

/// Build the launch command for `descriptor` in `ctx`.
///
/// Argument vector: `jvmOpts ++ ["-cp", classpath] ++ [mainClass] ++ args`.
pub fn build(descriptor: &LaunchDescriptor, ctx: &LaunchContext) -> LaunchCommand {
    let working_dir = match descriptor.working_dir.as_deref() {
        Some(dir) => ctx.cwd.join(dir),
        None => ctx.cwd.clone(),
    };
    let cwd = working_dir.display().to_string();
    let expand = |value: &String| value.replace(CWD_TOKEN, &cwd);

    let java_home = descriptor.java_home.as_ref().map(PathBuf::from).or_else(|| {
        ctx.env
            .get(OsStr::new("JAVA_HOME"))
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    });
    let executable = match java_home.as_deref() {
        Some(home) => home.join("bin").join("java"),
        None => PathBuf::from("java"),
    };

    let classpath = descriptor
        .classpath
        .iter()
        .map(expand)
        .collect::<Vec<_>>()
        .join(CLASSPATH_SEPARATOR);

    let mut args: Vec<String> = descriptor.jvm_opts.iter().map(expand).collect();
    args.push("-cp".to_string());
    args.push(classpath);
    args.push(descriptor.main_class.clone());
    args.extend(descriptor.args.iter().map(expand));

    let mut env = ctx.env.clone();
    env.extend(
        descriptor
            .env
            .iter()
            .map(|(k, v)| (OsString::from(k), OsString::from(expand(v)))),
    );
    if let Some(home) = descriptor.java_home.as_ref() {
        env.insert(OsString::from("JAVA_HOME"), OsString::from(home));
    }

    LaunchCommand {
        executable,
        args,
        env,
        working_dir,
        java_home,
    }
}

impl LaunchCommand {
    /// Directories from the descriptor, resolved against the working directory.
    pub fn resolve_dirs(&self, descriptor: &LaunchDescriptor) -> Vec<PathBuf> {
        descriptor
            .dirs
            .iter()
            .map(|dir| self.working_dir.join(dir))
            .collect()
    }

    /// Startup header written to the output file ahead of the child's own output.
    pub fn header(&self) -> String {
        let java_home = match self.java_home.as_deref() {
            Some(home) => home.display().to_string(),
            None => "<unset, resolving java from PATH>".to_string(),
        };
        format!(
            "Using JAVA_HOME: {java_home}\nArgument list to executable binary: [{self}]\n"
        )
    }
}

impl fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.executable.display())?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> LaunchDescriptor {
        LaunchDescriptor {
            service_name: None,
            main_class: "com.example.Main".to_string(),
            classpath: vec!["lib/a.jar".to_string(), "lib/b.jar".to_string()],
            jvm_opts: vec!["-Xmx1g".to_string()],
            args: vec!["server".to_string(), "var/conf/app.yml".to_string()],
            env: BTreeMap::new(),
            java_home: None,
            working_dir: None,
            dirs: vec![],
        }
    }

    fn ctx() -> LaunchContext {
        LaunchContext {
            env: BTreeMap::from([(OsString::from("PATH"), OsString::from("/usr/bin"))]),
            cwd: PathBuf::from("/srv/service"),
        }
    }

    #[test]
    fn argument_vector_order() {
        let cmd = build(&descriptor(), &ctx());
        let classpath = format!("lib/a.jar{CLASSPATH_SEPARATOR}lib/b.jar");
        assert_eq!(
            cmd.args,
            vec![
                "-Xmx1g",
                "-cp",
                classpath.as_str(),
                "com.example.Main",
                "server",
                "var/conf/app.yml",
            ]
        );
        assert_eq!(cmd.working_dir, PathBuf::from("/srv/service"));
    }

    #[test]
    fn java_home_from_descriptor_is_exported() {
        let mut d = descriptor();
        d.java_home = Some("/opt/jdk".to_string());
        let cmd = build(&d, &ctx());
        assert_eq!(cmd.executable, PathBuf::from("/opt/jdk/bin/java"));
        assert_eq!(cmd.env[OsStr::new("JAVA_HOME")], "/opt/jdk");
        assert_eq!(cmd.env[OsStr::new("PATH")], "/usr/bin");
    }

    #[test]
    fn java_home_falls_back_to_environment_then_path() {
        let mut c = ctx();
        c.env.insert(OsString::from("JAVA_HOME"), OsString::from("/usr/lib/jvm"));
        assert_eq!(
            build(&descriptor(), &c).executable,
            PathBuf::from("/usr/lib/jvm/bin/java")
        );
        assert_eq!(build(&descriptor(), &ctx()).executable, PathBuf::from("java"));
    }

    #[test]
    fn descriptor_env_overlays_process_env_and_expands_cwd() {
        let mut d = descriptor();
        d.working_dir = Some("app".to_string());
        d.env.insert("PATH".to_string(), "{{CWD}}/bin".to_string());
        d.jvm_opts.push("-Dlog.dir={{CWD}}/var/log".to_string());

        let cmd = build(&d, &ctx());
        assert_eq!(cmd.working_dir, PathBuf::from("/srv/service/app"));
        assert_eq!(cmd.env[OsStr::new("PATH")], "/srv/service/app/bin");
        assert!(cmd.args.contains(&"-Dlog.dir=/srv/service/app/var/log".to_string()));
    }

    #[test]
    fn header_names_java_home_and_arguments() {
        let mut d = descriptor();
        d.java_home = Some("/opt/jdk".to_string());
        let header = build(&d, &ctx()).header();
        assert!(header.starts_with("Using JAVA_HOME: /opt/jdk\n"));
        assert!(header.contains("[/opt/jdk/bin/java -Xmx1g -cp"));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_process_env_is_passed_through() {
        use std::os::unix::ffi::OsStrExt;

        let raw = OsStr::from_bytes(b"\xff\xfe");
        let mut c = ctx();
        c.env.insert(OsString::from("RAW_BYTES"), raw.to_os_string());
        c.env.insert(OsString::from("JAVA_HOME"), raw.to_os_string());

        let cmd = build(&descriptor(), &c);
        assert_eq!(cmd.env[OsStr::new("RAW_BYTES")].as_os_str(), raw);
        assert_eq!(cmd.executable, PathBuf::from(raw).join("bin").join("java"));
    }
}
