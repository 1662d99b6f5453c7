//! External script compiler
//!
//! Patch scripts are turned into bytecode by an external LuaJIT binary run
//! as `<compiler> -b <script> <output>`. Modules required by the script are
//! looked up next to the compiler through `LUA_PATH`.

use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Duration;

use tempfile::NamedTempFile;
use wait_timeout::ChildExt;

use crate::error::CompileError;

/// Something that compiles a script file into bytecode
pub trait ScriptCompiler {
    /// Compile `script`, returning the bytecode
    fn compile(&self, script: &Path) -> Result<Vec<u8>, CompileError>;
}

impl<F> ScriptCompiler for F
where
    F: Fn(&Path) -> Result<Vec<u8>, CompileError>,
{
    fn compile(&self, script: &Path) -> Result<Vec<u8>, CompileError> {
        self(script)
    }
}

/// LuaJIT bytecode compiler run as a subprocess
#[derive(Debug, Clone)]
pub struct LuaJitCompiler {
    path: PathBuf,
    timeout: Duration,
}

impl LuaJitCompiler {
    /// Compiler at `path`, killed if a compilation exceeds `timeout`
    pub fn new(path: PathBuf, timeout: Duration) -> Self {
        Self { path, timeout }
    }

    /// Compiler executable
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Time limit per compilation
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    fn lua_path(&self) -> PathBuf {
        self.path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join("?.lua")
    }
}

impl ScriptCompiler for LuaJitCompiler {
    fn compile(&self, script: &Path) -> Result<Vec<u8>, CompileError> {
        // Both files are removed when dropped, whichever way this returns.
        let output = NamedTempFile::new()?;
        let mut stderr = tempfile::tempfile()?;

        let mut child = Command::new(&self.path)
            .arg("-b")
            .arg(script)
            .arg(output.path())
            .env("LUA_PATH", self.lua_path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(stderr.try_clone()?))
            .spawn()
            .map_err(|source| CompileError::Spawn {
                compiler: self.path.clone(),
                source,
            })?;

        let Some(status) = child.wait_timeout(self.timeout)? else {
            child.kill()?;
            child.wait()?;
            return Err(CompileError::Timeout {
                script: script.to_path_buf(),
                timeout: self.timeout,
            });
        };

        if !status.success() {
            let mut message = String::new();
            stderr.seek(SeekFrom::Start(0))?;
            stderr.read_to_string(&mut message)?;
            return Err(CompileError::Failed {
                script: script.to_path_buf(),
                status,
                stderr: message.trim_end().to_string(),
            });
        }

        let bytecode = std::fs::read(output.path())?;
        tracing::debug!(
            script = %script.display(),
            size = bytecode.len(),
            "compiled script"
        );
        Ok(bytecode)
    }
}

#[cfg(all(test, unix))]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn fake_compiler(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("luajit");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    #[test]
    fn test_output_is_read_back() {
        let dir = TempDir::new().unwrap();
        let compiler = fake_compiler(dir.path(), r#"printf 'BC:%s' "$LUA_PATH" > "$3""#);
        let script = dir.path().join("main.lua");
        std::fs::write(&script, "print(1)").unwrap();

        let bytecode = LuaJitCompiler::new(compiler, Duration::from_secs(10))
            .compile(&script)
            .expect("compile");
        let expected = format!("BC:{}", dir.path().join("?.lua").display());
        assert_eq!(bytecode, expected.into_bytes());
    }

    #[test]
    fn test_failure_captures_stderr() {
        let dir = TempDir::new().unwrap();
        let compiler = fake_compiler(dir.path(), "echo 'syntax error near end' >&2\nexit 1");
        let err = LuaJitCompiler::new(compiler, Duration::from_secs(10))
            .compile(&dir.path().join("bad.lua"))
            .unwrap_err();
        match err {
            CompileError::Failed { stderr, .. } => assert_eq!(stderr, "syntax error near end"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_timeout_kills_compiler() {
        let dir = TempDir::new().unwrap();
        let compiler = fake_compiler(dir.path(), "exec sleep 30");
        let err = LuaJitCompiler::new(compiler, Duration::from_millis(200))
            .compile(&dir.path().join("slow.lua"))
            .unwrap_err();
        assert!(matches!(err, CompileError::Timeout { .. }));
    }

    #[test]
    fn test_missing_compiler() {
        let err = LuaJitCompiler::new(PathBuf::from("/nonexistent/luajit"), Duration::from_secs(1))
            .compile(Path::new("x.lua"))
            .unwrap_err();
        assert!(matches!(err, CompileError::Spawn { .. }));
    }

    #[test]
    fn test_closure_compiler() {
        let compiler = |_: &Path| -> Result<Vec<u8>, CompileError> { Ok(vec![1, 2, 3]) };
        assert_eq!(compiler.compile(Path::new("a.lua")).unwrap(), vec![1, 2, 3]);
    }
}
