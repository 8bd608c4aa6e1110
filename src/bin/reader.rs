use crossterm::{
    cursor::MoveTo,
    execute,
    style::Stylize,
    terminal::{Clear, ClearType},
};
use lab_core::core::engine::RenderedVerse;
use lab_core::{InjectionSettings, LabConfig, QuranLab};
use std::io::{self, BufRead, Write};

const LEVEL_STEP: u8 = 5;
const HELP: &str =
    "[enter] next  [b] back  [+/-] level  [w] what's left  :k word  :u word  :s N  [q] quit";

struct ReaderState {
    surah: u32,
    verse: usize,
    settings: InjectionSettings,
}

fn main() -> io::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = LabConfig::from_env();
    let lab = match QuranLab::from_config(&config) {
        Ok(lab) => lab,
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            std::process::exit(1);
        }
    };

    let surah = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .or_else(|| lab.surahs().first().map(|s| s.number))
        .unwrap_or(1);
    let mut state = ReaderState {
        surah,
        verse: 0,
        settings: InjectionSettings::default(),
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    show(&lab, &state, &mut stdout)?;

    for line in stdin.lock().lines() {
        let input = line?;
        let input = input.trim();
        match input {
            "" => state.verse += 1,
            "+" => {
                let level = &mut state.settings.injection_level;
                *level = level.saturating_add(LEVEL_STEP).min(100);
            }
            "-" => {
                let level = &mut state.settings.injection_level;
                *level = level.saturating_sub(LEVEL_STEP);
            }
            "w" => state.settings.whats_left_mode = !state.settings.whats_left_mode,
            "b" => state.verse = state.verse.saturating_sub(1),
            "q" | "exit" => break,
            _ => {
                if let Some(key) = input.strip_prefix(":k ") {
                    if let Err(e) = lab.mark_known(key.trim()) {
                        writeln!(stdout, "{} {}", "!".red(), e)?;
                        continue;
                    }
                } else if let Some(key) = input.strip_prefix(":u ") {
                    if let Err(e) = lab.mark_unknown(key.trim()) {
                        writeln!(stdout, "{} {}", "!".red(), e)?;
                        continue;
                    }
                } else if let Some(n) =
                    input.strip_prefix(":s ").and_then(|n| n.trim().parse().ok())
                {
                    state.surah = n;
                    state.verse = 0;
                } else {
                    writeln!(stdout, "Unknown command '{input}'")?;
                    continue;
                }
            }
        }
        if !show(&lab, &state, &mut stdout)? {
            break;
        }
    }
    Ok(())
}

/// Redraws the current verse. Returns false once the surah is finished.
fn show(lab: &QuranLab, state: &ReaderState, stdout: &mut io::Stdout) -> io::Result<bool> {
    let verse = match lab.render_single(state.surah, state.verse, &state.settings) {
        Ok(Some(verse)) => verse,
        Ok(None) => {
            writeln!(stdout, "{}", "End of surah.".dim())?;
            return Ok(false);
        }
        Err(e) => {
            writeln!(stdout, "{} {}", "!".red(), e)?;
            return Ok(true);
        }
    };
    let Ok(surah) = lab.surah(state.surah) else {
        return Ok(true);
    };
    let stats = lab.familiarity().stats;

    execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
    writeln!(
        stdout,
        "{} {}  {}/{}",
        surah.name_en.as_str().bold(),
        surah.name_ar,
        verse.number,
        surah.verses.len()
    )?;
    writeln!(stdout)?;
    writeln!(stdout, "{}", hybrid_line(&verse))?;
    writeln!(stdout)?;
    writeln!(stdout, "{}", verse.english.as_str().dim())?;
    writeln!(stdout)?;
    writeln!(
        stdout,
        "level {}%{}  seen {}  known {}",
        state.settings.injection_level,
        if state.settings.whats_left_mode { "  what's left" } else { "" },
        stats.seen,
        stats.known
    )?;
    writeln!(stdout, "{}", HELP.dim())?;
    stdout.flush()?;
    Ok(true)
}

fn hybrid_line(verse: &RenderedVerse) -> String {
    verse
        .words
        .iter()
        .map(|word| {
            if word.show_arabic {
                format!("{}", word.arabic.as_str().green().bold())
            } else {
                word.english.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
