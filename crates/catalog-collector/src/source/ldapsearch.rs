//! [`LdapSearch`]: a directory source backed by the `ldapsearch` client.

use std::process::Stdio;

use catalog_core::source::{Attributes, DirectorySource, SearchScope};
use tokio::process::Command;
use tracing::debug;

use super::{SourceError, ldif};

/// Runs one anonymous `ldapsearch` per search and parses its LDIF output.
#[derive(Debug, Clone)]
pub struct LdapSearch {
  program: String,
  uri:     String,
}

impl LdapSearch {
  pub fn new(uri: impl Into<String>) -> Self {
    Self {
      program: "ldapsearch".to_owned(),
      uri:     uri.into(),
    }
  }

  /// Use another executable in place of `ldapsearch`.
  pub fn with_program(mut self, program: impl Into<String>) -> Self {
    self.program = program.into();
    self
  }

  pub fn uri(&self) -> &str { &self.uri }

  fn args(&self, base: &str, scope: SearchScope) -> Vec<String> {
    let scope = scope.to_string();
    [
      "-x",
      "-LLL",
      "-o",
      "ldif-wrap=no",
      "-H",
      self.uri.as_str(),
      "-b",
      base,
      "-s",
      scope.as_str(),
      "(objectClass=*)",
      "*",
      "createTimestamp",
    ]
    .map(str::to_owned)
    .to_vec()
  }
}

impl DirectorySource for LdapSearch {
  type Error = SourceError;

  async fn search<'a>(
    &'a self,
    base: &'a str,
    scope: SearchScope,
  ) -> Result<Vec<Attributes>, SourceError> {
    let output = Command::new(&self.program)
      .args(self.args(base, scope))
      .stdin(Stdio::null())
      .kill_on_drop(true)
      .output()
      .await
      .map_err(|source| SourceError::Spawn {
        program: self.program.clone(),
        source,
      })?;

    if !output.status.success() {
      return Err(SourceError::Exit {
        program: self.program.clone(),
        status:  output.status,
        stderr:  String::from_utf8_lossy(&output.stderr).trim().to_owned(),
      });
    }

    let records = ldif::parse(&String::from_utf8_lossy(&output.stdout))?;
    debug!(base, %scope, records = records.len(), "ldapsearch finished");
    Ok(records)
  }
}
