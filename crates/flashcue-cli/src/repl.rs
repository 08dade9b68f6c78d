//! Line commands typed while a session runs.

use std::str::FromStr;

use flashcue_core::{LoopMode, Phase};
use flashcue_session::Intent;

pub const HELP: &str = "\
Commands:
  play | p               start or resume
  pause                  pause (the current phase restarts on play)
  next | n               next card
  prev | b               previous card
  skip front|pause|back  jump within the current card
  restart | r            back to the first card
  delay <5-60>           seconds between front and back
  volume <0-1>           output volume
  rate <0.5-2>           speech rate
  pitch <0.5-2>          speech pitch
  voice [id]             choose a voice (no id = platform default)
  loop none|all|single   what happens after the last card
  shuffle                toggle shuffle
  clear                  dismiss the last speech error
  status | s             show the session state
  voices [refresh]       list available voices (refresh reloads the catalog)
  help | h               this help
  quit | q               leave Listen Mode";

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    /// Forwarded to the session controller.
    Intent(Intent),
    Status,
    /// List voices; `refresh` reloads the catalog first.
    Voices { refresh: bool },
    Help,
    Quit,
}

impl FromStr for ReplCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            return Err("empty command".to_string());
        };
        let argument = words.next();

        let intent = match command.to_ascii_lowercase().as_str() {
            "play" | "p" => Intent::Play,
            "pause" => Intent::Pause,
            "next" | "n" => Intent::Next,
            "prev" | "previous" | "b" => Intent::Previous,
            "skip" => Intent::SkipTo(parse_skip_target(argument)?),
            "restart" | "r" => Intent::Restart,
            "delay" => Intent::SetPauseDuration(parse_arg(command, argument)?),
            "volume" => Intent::SetVolume(parse_arg(command, argument)?),
            "rate" => Intent::SetRate(parse_arg(command, argument)?),
            "pitch" => Intent::SetPitch(parse_arg(command, argument)?),
            "voice" => Intent::SetVoice(
                argument
                    .filter(|id| !id.eq_ignore_ascii_case("default"))
                    .map(str::to_string),
            ),
            "loop" => Intent::SetLoopMode(parse_arg::<LoopMode>(command, argument)?),
            "shuffle" => Intent::ToggleShuffle,
            "clear" => Intent::ClearError,
            "status" | "s" => return Ok(Self::Status),
            "voices" => return parse_voices(argument),
            "help" | "h" | "?" => return Ok(Self::Help),
            "quit" | "q" | "exit" => return Ok(Self::Quit),
            other => return Err(format!("unknown command '{other}' (type 'help')")),
        };
        Ok(Self::Intent(intent))
    }
}

fn parse_arg<T: FromStr>(command: &str, argument: Option<&str>) -> Result<T, String> {
    let argument = argument.ok_or_else(|| format!("'{command}' needs a value"))?;
    argument
        .parse()
        .map_err(|_| format!("invalid value for '{command}': {argument}"))
}

fn parse_voices(argument: Option<&str>) -> Result<ReplCommand, String> {
    match argument {
        None => Ok(ReplCommand::Voices { refresh: false }),
        Some(word) if word.eq_ignore_ascii_case("refresh") => {
            Ok(ReplCommand::Voices { refresh: true })
        }
        Some(other) => Err(format!("unknown voices option '{other}' (use 'voices refresh')")),
    }
}

fn parse_skip_target(argument: Option<&str>) -> Result<Phase, String> {
    let phase: Phase = parse_arg("skip", argument)?;
    if phase.is_skip_target() {
        Ok(phase)
    } else {
        Err(format!("cannot skip to '{phase}' (use front, pause or back)"))
    }
}
