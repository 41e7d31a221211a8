use clap::Parser;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use steply_mask::config::{MaskConfig, PatternConfig};
use steply_mask::mask::{NamedKind, PatternOptions, presets};
use steply_mask::terminal::{EditCommand, Terminal, TerminalEvent};
use steply_mask::{MaskError, MaskedField};

#[derive(Parser, Debug)]
#[command(version, about = "Type into a masked input line")]
struct Args {
    /// Preset name, keyword (date, time, rangeDate, number) or template
    #[arg(long, short, default_value = "phone_us")]
    mask: String,
    /// Locale for named patterns, e.g. de-DE
    #[arg(long)]
    locale: Option<String>,
    /// Date or time format for named patterns
    #[arg(long)]
    format: Option<String>,
    #[arg(long)]
    no_guide: bool,
    #[arg(long)]
    keep_positions: bool,
    #[arg(long, default_value_t = '_')]
    placeholder_char: char,
    /// YAML or JSON mask config; overrides the other mask flags
    #[arg(long, short)]
    config: Option<PathBuf>,
    #[arg(long)]
    list_presets: bool,
    /// Print the JSON schema of the config file and exit
    #[arg(long)]
    schema: bool,
}

impl Args {
    fn mask_config(&self) -> Result<MaskConfig, MaskError> {
        if let Some(path) = &self.config {
            return MaskConfig::load(path);
        }
        let pattern = if presets::preset(self.mask.as_str()).is_some() {
            PatternConfig::Preset(self.mask.clone())
        } else if NamedKind::from_keyword(self.mask.as_str()).is_some() {
            PatternConfig::Keyword(self.mask.clone())
        } else {
            PatternConfig::Template(self.mask.clone())
        };
        Ok(MaskConfig {
            pattern,
            guide: !self.no_guide,
            keep_character_positions: self.keep_positions,
            placeholder_char: self.placeholder_char,
            show_mask: false,
            options: PatternOptions {
                locale: self.locale.clone(),
                format: self.format.clone(),
                ..PatternOptions::default()
            },
            pipe: None,
        })
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.list_presets {
        for name in presets::names() {
            println!("{name}");
        }
        return ExitCode::SUCCESS;
    }
    if args.schema {
        println!("{:#}", MaskConfig::json_schema());
        return ExitCode::SUCCESS;
    }

    let state = match args.mask_config().and_then(MaskConfig::into_state) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match run(MaskedField::new(state)) {
        Ok(Some(value)) => {
            println!("{value}");
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::from(130),
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(mut field: MaskedField) -> io::Result<Option<String>> {
    let mut terminal = Terminal::new()?;
    terminal.enter_raw_mode()?;

    let result = event_loop(&mut terminal, &mut field);

    let restored = terminal.exit_raw_mode();
    let finished = terminal.finish_line();
    settle(result, [restored, finished])
}

/// Reports the event loop outcome once every teardown step has run. The loop
/// error wins; otherwise the first teardown failure is returned.
fn settle<T, const N: usize>(
    result: io::Result<T>,
    teardown: [io::Result<()>; N],
) -> io::Result<T> {
    let value = result?;
    teardown.into_iter().collect::<io::Result<()>>()?;
    Ok(value)
}

fn event_loop(terminal: &mut Terminal, field: &mut MaskedField) -> io::Result<Option<String>> {
    const PROMPT: &str = "> ";
    let mut render_requested = true;

    loop {
        if render_requested {
            terminal.draw_field(PROMPT, field)?;
            render_requested = false;
        }

        if !terminal.poll(Duration::from_millis(100))? {
            continue;
        }
        let command = match terminal.read_event()? {
            TerminalEvent::Edit(command) => command,
            TerminalEvent::Resize { .. } => {
                render_requested = true;
                continue;
            }
        };

        match command {
            EditCommand::Submit => return Ok(Some(field.value().to_string())),
            EditCommand::Cancel => return Ok(None),
            EditCommand::Insert(ch) => {
                field.insert_char(ch);
            }
            EditCommand::Paste(text) => {
                field.insert_str(text.as_str());
            }
            EditCommand::Backspace => {
                field.backspace();
            }
            EditCommand::Delete => {
                field.delete_forward();
            }
            EditCommand::Left => {
                field.move_left();
            }
            EditCommand::Right => {
                field.move_right();
            }
            EditCommand::Home => field.home(),
            EditCommand::End => field.end(),
            EditCommand::Clear => {
                field.clear();
            }
        }
        render_requested = true;
    }
}
