//! Help text for the Athena shell.

/// Help text displayed for the `help` command.
pub const HELP_TEXT: &str = r#"Shell commands:
  help                     - Show this help message
  quit, exit               - Exit the shell (or press Ctrl+D)
  use <schema>             - Set the default schema
  set                      - Show current settings
  set format <FORMAT>      - ALIGNED, TRUNCATE, VERTICAL, CSV, TSV, CSV_HEADER, TSV_HEADER
  set debug <on|off>       - Toggle debug output

Supported statements (end with ;):
  SELECT
  ALTER DATABASE <schema>
  ALTER TABLE <table>
  CREATE DATABASE <schema>
  CREATE TABLE <table>
  DESCRIBE <table>
  DROP DATABASE <schema>
  DROP TABLE <table>
  MSCK REPAIR TABLE <table>
  SHOW COLUMNS FROM <table>
  SHOW CREATE TABLE <table>
  SHOW DATABASES [LIKE <pattern>]
  SHOW PARTITIONS <table>
  SHOW TABLES [IN <schema>] [<pattern>]
  SHOW TBLPROPERTIES <table>
  USE [<catalog>.]<schema>
  VALUES row [, ...]

Keyboard shortcuts:
  Ctrl+C  - Cancel the running query, or clear the current line
  Ctrl+D  - Exit

See http://docs.aws.amazon.com/athena/latest/ug/language-reference.html"#;
