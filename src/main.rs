// ==========================================
// 控制 ANS - 命令行入口
// ==========================================
// 子命令:
//   ans      <entrada> <salida> [--form F] [--now TS]
//   almacen  <fuente_a> <fuente_b> <salida>
//   limpieza <entrada> <salida>
// 通用选项: --config F, --lang es|en, --json-log
// ==========================================

use anyhow::Context;
use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use control_ans::api::{AnsApi, CleaningApi, InventoryApi};
use control_ans::i18n::{self, t_with_args};
use control_ans::importer::DataCleaner;
use control_ans::logging;
use std::path::PathBuf;
use std::process::ExitCode;

// ==========================================
// 命令行参数
// ==========================================

/// control-ans: cálculo de ANS y control de almacén
#[derive(Parser, Debug)]
#[command(name = "control-ans")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Archivo de configuración JSON
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Idioma de los mensajes (es, en)
    #[arg(long, global = true)]
    lang: Option<String>,

    /// Logs en formato JSON
    #[arg(long, global = true)]
    json_log: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
enum Command {
    /// Calcula fecha límite y estado ANS de cada pedido
    Ans {
        /// Exportación de pedidos pendientes (.xlsx / .csv)
        input: PathBuf,

        /// Archivo .xlsx o directorio / archivo .csv de salida
        output: PathBuf,

        /// Formulario con el estado del pedido
        #[arg(long)]
        form: Option<PathBuf>,

        /// Fecha de referencia "AAAA-MM-DD HH:MM:SS" (por defecto: ahora)
        #[arg(long, value_parser = parse_now)]
        now: Option<NaiveDateTime>,
    },

    /// Cruza el consumo de materiales de ambas fuentes
    Almacen {
        /// Fuente A (FENIX)
        source_a: PathBuf,

        /// Fuente B (ELITE), libro con varias hojas
        source_b: PathBuf,

        /// Archivo .xlsx o directorio / archivo .csv de salida
        output: PathBuf,
    },

    /// Limpia la exportación de pedidos
    Limpieza {
        /// Exportación de pedidos (.xlsx / .csv)
        input: PathBuf,

        /// Archivo .xlsx o .csv de salida
        output: PathBuf,
    },
}

fn parse_now(raw: &str) -> Result<NaiveDateTime, String> {
    DataCleaner
        .parse_timestamp(raw)
        .ok_or_else(|| t_with_args("cli.invalid_now", &[("value", raw)]))
}

fn run(cli: Cli) -> anyhow::Result<String> {
    match cli.command {
        Command::Ans {
            input,
            output,
            form,
            now,
        } => {
            let now = now.unwrap_or_else(|| chrono::Local::now().naive_local());
            let report = AnsApi::from_config(cli.config)?
                .run(&input, &output, form.as_deref(), now)
                .with_context(|| format!("ANS: {}", input.display()))?;
            Ok(t_with_args(
                "ans.done",
                &[
                    ("total", &report.total.to_string()),
                    ("files", &report.output_files.join(", ")),
                ],
            ))
        }
        Command::Almacen {
            source_a,
            source_b,
            output,
        } => {
            let report = InventoryApi::from_config(cli.config)?
                .run(&source_a, &source_b, &output)
                .with_context(|| format!("almacen: {} / {}", source_a.display(), source_b.display()))?;
            Ok(t_with_args(
                "almacen.done",
                &[
                    ("matched", &report.matched.to_string()),
                    ("unmatched", &report.unmatched.to_string()),
                    ("files", &report.output_files.join(", ")),
                ],
            ))
        }
        Command::Limpieza { input, output } => {
            let report = CleaningApi::from_config(cli.config)?
                .run(&input, &output)
                .with_context(|| format!("limpieza: {}", input.display()))?;
            Ok(t_with_args(
                "limpieza.done",
                &[
                    ("kept", &report.report.kept_rows.to_string()),
                    ("total", &report.report.total_rows.to_string()),
                    ("files", &report.output_files.join(", ")),
                ],
            ))
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(lang) = &cli.lang {
        i18n::set_locale(lang);
    }
    if cli.json_log {
        logging::init_json();
    } else {
        logging::init();
    }

    tracing::info!(version = control_ans::VERSION, "{} 启动", control_ans::APP_NAME);

    match run(cli) {
        Ok(message) => {
            println!("{}", message);
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(error = ?err, "批处理失败");
            eprintln!("{}", t_with_args("common.error", &[("message", &format!("{:#}", err))]));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_ans_command() {
        let cli = Cli::try_parse_from([
            "control-ans",
            "ans",
            "pendientes.csv",
            "FENIX_ANS.xlsx",
            "--form",
            "form.csv",
            "--now",
            "2025-03-26 09:00:00",
            "--config",
            "cfg.json",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("cfg.json")));
        assert_eq!(
            cli.command,
            Command::Ans {
                input: PathBuf::from("pendientes.csv"),
                output: PathBuf::from("FENIX_ANS.xlsx"),
                form: Some(PathBuf::from("form.csv")),
                now: NaiveDate::from_ymd_opt(2025, 3, 26)
                    .unwrap()
                    .and_hms_opt(9, 0, 0),
            }
        );
    }

    #[test]
    fn test_parse_almacen_command() {
        let cli = Cli::try_parse_from([
            "control-ans",
            "almacen",
            "fenix.xlsx",
            "elite.xlsx",
            "salida",
            "--json-log",
        ])
        .unwrap();
        assert!(cli.json_log);
        assert!(matches!(cli.command, Command::Almacen { .. }));
    }

    #[test]
    fn test_parse_errors() {
        fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
            Cli::try_parse_from(std::iter::once("control-ans").chain(args.iter().copied()))
        }

        assert!(parse(&[]).is_err());
        assert!(parse(&["calcular", "a", "b"]).is_err());
        assert!(parse(&["limpieza", "a"]).is_err());
        assert!(parse(&["ans", "a", "b", "--now"]).is_err());
        assert!(parse(&["ans", "a", "b", "--now", "ayer"]).is_err());
        assert!(parse(&["ans", "a", "b", "--verbose"]).is_err());
        // --form 仅属于 ans
        assert!(parse(&["almacen", "a", "b", "c", "--form", "x"]).is_err());
    }

    #[test]
    fn test_help_is_displayed() {
        let err = Cli::try_parse_from(["control-ans", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
