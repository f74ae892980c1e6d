//! Line-oriented command front end for a [`NaturalTuple`].
//!
//! One command per line:
//!
//! | command    | output                                               |
//! |------------|------------------------------------------------------|
//! | `info`     | the tuple, comma separated (`-1` when empty)         |
//! | `min`      | smallest number, or an empty notice followed by `-1` |
//! | `max`      | largest number, or an empty notice followed by `-1`  |
//! | `swap a b` | nothing, or a failure notice                         |
//! | `remove n` | `true` or `false`                                    |
//! | `insert n` | nothing                                              |
//! | `quit`     | stops the loop                                       |

use crate::tuple::{NaturalTuple, SENTINEL};
use std::io::{self, BufRead, Write};
use thiserror::Error;
use tracing::{debug, warn};

pub const EMPTY_NOTICE: &str = "The tuple is empty.\nEnd of line.";
pub const SWAP_FAILED_NOTICE: &str = "Swapping unsuccessful.\nEnd of Line.";

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("empty command line")]
    Empty,

    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    #[error("`{command}` is missing argument {position}")]
    MissingArgument {
        command: &'static str,
        position: usize,
    },

    #[error("`{0}` is not a valid number")]
    InvalidNumber(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Info,
    Min,
    Max,
    /// Positions as typed; negative ones are simply invalid.
    Swap(i64, i64),
    Remove(i32),
    Insert(i32),
    Quit,
}

/// What the loop should do after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, DriverError> {
        let mut tokens = line.split_whitespace();
        let name = tokens.next().ok_or(DriverError::Empty)?;

        let cmd = match name {
            "info" => Command::Info,
            "min" => Command::Min,
            "max" => Command::Max,
            "quit" => Command::Quit,
            "swap" => {
                let a = number_arg(tokens.next(), "swap", 1)?;
                let b = number_arg(tokens.next(), "swap", 2)?;
                Command::Swap(a, b)
            }
            "remove" => Command::Remove(number_arg(tokens.next(), "remove", 1)?),
            "insert" => Command::Insert(number_arg(tokens.next(), "insert", 1)?),
            other => return Err(DriverError::UnknownCommand(other.to_owned())),
        };
        Ok(cmd)
    }
}

fn number_arg<N: std::str::FromStr>(
    token: Option<&str>,
    command: &'static str,
    position: usize,
) -> Result<N, DriverError> {
    let token = token.ok_or(DriverError::MissingArgument { command, position })?;
    token
        .parse()
        .map_err(|_| DriverError::InvalidNumber(token.to_owned()))
}

/// Apply one command to `tuple`, writing its response to `out`.
pub fn execute<W: Write>(tuple: &mut NaturalTuple, cmd: Command, out: &mut W) -> io::Result<Flow> {
    debug!(?cmd, "execute");
    match cmd {
        Command::Quit => return Ok(Flow::Quit),
        Command::Info => writeln!(out, "{tuple}")?,
        Command::Min => write_extremum(out, tuple.min())?,
        Command::Max => write_extremum(out, tuple.max())?,
        Command::Swap(a, b) => {
            let swapped = match (usize::try_from(a), usize::try_from(b)) {
                (Ok(a), Ok(b)) => tuple.swap(a, b),
                _ => false,
            };
            if !swapped {
                writeln!(out, "{SWAP_FAILED_NOTICE}")?;
            }
        }
        Command::Remove(n) => writeln!(out, "{}", tuple.remove(n))?,
        Command::Insert(n) => tuple.insert(n),
    }
    Ok(Flow::Continue)
}

fn write_extremum<W: Write>(out: &mut W, value: i32) -> io::Result<()> {
    if value == SENTINEL {
        writeln!(out, "{EMPTY_NOTICE}")?;
    }
    writeln!(out, "{value}")
}

/// Read commands from `input` until `quit` or end of input.
///
/// Lines that do not parse are logged and skipped.
pub fn run<R, W>(tuple: &mut NaturalTuple, input: R, mut output: W) -> Result<(), DriverError>
where
    R: BufRead,
    W: Write,
{
    for line in input.lines() {
        let line = line?;
        let cmd = match Command::parse(&line) {
            Ok(cmd) => cmd,
            Err(DriverError::Empty) => continue,
            Err(err) => {
                warn!(%err, line = line.as_str(), "skipping command");
                continue;
            }
        };
        if execute(tuple, cmd, &mut output)? == Flow::Quit {
            break;
        }
    }
    output.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn session(initial: &[i32], script: &str) -> (NaturalTuple, String) {
        let mut tuple = NaturalTuple::from(initial);
        let mut out = Vec::new();
        run(&mut tuple, Cursor::new(script), &mut out).unwrap();
        (tuple, String::from_utf8(out).unwrap())
    }

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("info").unwrap(), Command::Info);
        assert_eq!(Command::parse("  swap 1   -2 ").unwrap(), Command::Swap(1, -2));
        assert_eq!(Command::parse("insert 7").unwrap(), Command::Insert(7));
        assert_eq!(Command::parse("remove -3").unwrap(), Command::Remove(-3));
        assert_eq!(Command::parse("quit").unwrap(), Command::Quit);
    }

    #[test]
    fn rejects_malformed_commands() {
        assert!(matches!(Command::parse("   "), Err(DriverError::Empty)));
        assert!(matches!(
            Command::parse("dance"),
            Err(DriverError::UnknownCommand(c)) if c == "dance"
        ));
        assert!(matches!(
            Command::parse("swap 1"),
            Err(DriverError::MissingArgument { command: "swap", position: 2 })
        ));
        assert!(matches!(
            Command::parse("insert x"),
            Err(DriverError::InvalidNumber(t)) if t == "x"
        ));
    }

    #[test]
    fn full_session() {
        let script = "info\nmin\nmax\nremove 1\ninfo\nswap 0 2\ninfo\nswap 0 9\ninfo\nquit\ninfo\n";
        let (tuple, out) = session(&[3, 1, 4, 1, 5], script);
        assert_eq!(
            out,
            "3,1,4,1,5\n1\n5\ntrue\n3,4,5\n5,4,3\nSwapping unsuccessful.\nEnd of Line.\n5,4,3\n"
        );
        assert_eq!(tuple.to_string(), "5,4,3");
    }

    #[test]
    fn empty_tuple_notices() {
        let (_, out) = session(&[], "info\nmin\nmax\nremove 2\n");
        assert_eq!(
            out,
            "-1\nThe tuple is empty.\nEnd of line.\n-1\nThe tuple is empty.\nEnd of line.\n-1\nfalse\n"
        );
    }

    #[test]
    fn insert_is_silent_and_bad_lines_are_skipped() {
        let (tuple, out) = session(&[], "insert 4\ninsert 0\nbogus\n\ninsert two\ninsert 2\nswap -1 0\ninfo\n");
        assert_eq!(out, "Swapping unsuccessful.\nEnd of Line.\n4,2\n");
        assert_eq!(tuple.to_vec(), vec![4, 2]);
    }
}
