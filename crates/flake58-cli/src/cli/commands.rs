use crate::cli::config::{AppConfig, Command, PREFIX_SEPARATOR};
use anyhow::Context;
use flake58::{Decomposition, Generator, TimeSource};
use serde::Serialize;
use std::io::Write;

/// One decomposed ID as printed by `decompose --json`.
#[derive(Debug, Serialize)]
struct DecomposedId<'a> {
    input: &'a str,
    #[serde(flatten)]
    parts: Decomposition,
}

/// Runs the configured subcommand, writing its output to `out`.
pub fn run<T: TimeSource>(
    config: &AppConfig,
    generator: &Generator<T>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match &config.command {
        Command::Mint { count, prefix } => {
            mint(generator, *count, prefix.as_deref(), config.json, out)
        }
        Command::Decompose { ids } => decompose(generator, ids, config.json, out),
    }
}

fn mint<T: TimeSource>(
    generator: &Generator<T>,
    count: usize,
    prefix: Option<&str>,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut ids = Vec::with_capacity(count);
    for _ in 0..count {
        let id = generator.next_id().context("failed to mint id")?;
        ids.push(match prefix {
            Some(prefix) => format!("{prefix}{PREFIX_SEPARATOR}{id}"),
            None => id,
        });
    }
    tracing::info!(count, "minted ids");

    if json {
        serde_json::to_writer(&mut *out, &ids)?;
        writeln!(out)?;
    } else {
        for id in &ids {
            writeln!(out, "{id}")?;
        }
    }
    Ok(())
}

fn decompose<T: TimeSource>(
    generator: &Generator<T>,
    ids: &[String],
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let mut decoded = Vec::with_capacity(ids.len());
    for input in ids {
        let parts = generator
            .decompose(strip_prefix(input))
            .with_context(|| format!("cannot decompose {input:?}"))?;
        tracing::debug!(input = %input, id = parts.id, "decomposed id");
        decoded.push(DecomposedId { input, parts });
    }

    if json {
        serde_json::to_writer(&mut *out, &decoded)?;
        writeln!(out)?;
    } else {
        for DecomposedId { input, parts } in &decoded {
            writeln!(
                out,
                "{input}: id={} time={} sequence={} machine-id={} unix-millis={}",
                parts.id, parts.time, parts.sequence, parts.machine_id, parts.unix_millis
            )?;
        }
    }
    Ok(())
}

/// Drops a `tag_` prefix. Configured alphabets never contain the separator,
/// so the last one always ends the tag.
fn strip_prefix(input: &str) -> &str {
    input
        .rsplit_once(PREFIX_SEPARATOR)
        .map_or(input, |(_, id)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::config::MachineIdConfig;
    use flake58::{Encoder, Settings};
    use std::time::Duration;

    struct FixedTime(u64);
    impl TimeSource for FixedTime {
        fn current_millis(&self) -> u64 {
            self.0
        }
    }

    fn config(json: bool, command: Command) -> AppConfig {
        AppConfig {
            start_time: Duration::ZERO,
            machine_id: MachineIdConfig::Fixed(7),
            encoder: Encoder::standard(),
            json,
            command,
        }
    }

    fn generator() -> Generator<FixedTime> {
        Generator::with_clock(Settings::default().with_machine_id(7_u16), FixedTime(50)).unwrap()
    }

    fn run_to_string(config: &AppConfig, generator: &Generator<FixedTime>) -> String {
        let mut out = Vec::new();
        run(config, generator, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn mint_prints_one_id_per_line() {
        let generator = generator();
        let config = config(false, Command::Mint { count: 3, prefix: None });
        let output = run_to_string(&config, &generator);

        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        for (i, line) in lines.iter().enumerate() {
            let parts = generator.decompose(line).unwrap();
            assert_eq!(parts.time, 5);
            assert_eq!(parts.sequence, i as u64);
            assert_eq!(parts.machine_id, 7);
        }
    }

    #[test]
    fn mint_applies_prefix() {
        let generator = generator();
        let config = config(
            false,
            Command::Mint {
                count: 2,
                prefix: Some("dn".into()),
            },
        );
        let output = run_to_string(&config, &generator);
        for line in output.lines() {
            let id = line.strip_prefix("dn_").unwrap();
            assert_eq!(generator.decompose(id).unwrap().machine_id, 7);
        }
    }

    #[test]
    fn mint_json_is_an_array() {
        let generator = generator();
        let config = config(true, Command::Mint { count: 2, prefix: None });
        let output = run_to_string(&config, &generator);
        let ids: Vec<String> = serde_json::from_str(&output).unwrap();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn decompose_text() {
        let config = config(
            false,
            Command::Decompose {
                ids: vec!["8Rwre".into(), "usr_8Rwre".into()],
            },
        );
        let output = run_to_string(&config, &generator());
        let id = (5 << 24) | (3 << 16) | 7;
        assert_eq!(
            output,
            format!(
                "8Rwre: id={id} time=5 sequence=3 machine-id=7 unix-millis=50\n\
                 usr_8Rwre: id={id} time=5 sequence=3 machine-id=7 unix-millis=50\n"
            )
        );
    }

    #[test]
    fn decompose_json() {
        let config = config(
            true,
            Command::Decompose {
                ids: vec!["8Rwre".into()],
            },
        );
        let output = run_to_string(&config, &generator());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["input"], "8Rwre");
        assert_eq!(value[0]["time"], 5);
        assert_eq!(value[0]["sequence"], 3);
        assert_eq!(value[0]["machine_id"], 7);
        assert_eq!(value[0]["msb"], 0);
    }

    #[test]
    fn decompose_rejects_garbage() {
        let config = config(
            false,
            Command::Decompose {
                ids: vec!["8Rw0e".into()],
            },
        );
        let mut out = Vec::new();
        let err = run(&config, &generator(), &mut out).unwrap_err();
        assert!(err.to_string().contains("8Rw0e"));
        assert!(out.is_empty());
    }

    #[test]
    fn strips_last_underscore() {
        assert_eq!(strip_prefix("8Rwre"), "8Rwre");
        assert_eq!(strip_prefix("a_b_8Rwre"), "8Rwre");
    }
}
