mod config;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use cockpit_core::core_api::{FieldValues, Installer, SettingsReport};
use cockpit_core::field::Field;
use cockpit_core::network;
use cockpit_core::variant::{self, Variant};
use cockpit_render::{
    FieldSelection, JsonStyle, render_apply_json, render_apply_text, render_settings_json,
    render_settings_selected_json, render_settings_selected_pairs, render_settings_text,
    render_update_json, render_update_text, render_variants_json, render_variants_text,
};
use cockpit_update::HttpTransport;
use serde_json::Value as JsonValue;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum VariantArg {
    Release,
    #[value(alias = "open-beta")]
    Openbeta,
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    #[arg(long = "saved-games", global = true, value_name = "DIR")]
    saved_games: Option<PathBuf>,
    #[arg(long, global = true)]
    variant: Option<VariantArg>,
    #[arg(long = "scripts-dir", global = true, value_name = "DIR")]
    scripts_dir: Option<PathBuf>,
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the values currently set in the scripts.
    Show {
        #[arg(long = "client-ips")]
        client_ips: bool,
        #[arg(long = "dcs-port")]
        dcs_port: bool,
        #[arg(long = "android-port")]
        android_port: bool,
        #[arg(long)]
        json: bool,
    },
    /// Write new values into the installed script.
    Apply {
        #[command(flatten)]
        values: ValueArgs,
        #[arg(long)]
        json: bool,
    },
    /// Download the latest scripts and install them with the current values.
    Update {
        #[command(flatten)]
        values: ValueArgs,
        #[arg(long, value_name = "URL")]
        url: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Print this machine's LAN address.
    LocalIp,
    /// List DCS installations found under the saved-games folder.
    Variants {
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Args)]
struct ValueArgs {
    /// Client device address; repeat for several devices.
    #[arg(long = "ip", value_name = "IP")]
    ips: Vec<String>,
    #[arg(long = "dcs-port", value_name = "PORT")]
    dcs_port: Option<String>,
    #[arg(long = "android-port", value_name = "PORT")]
    android_port: Option<String>,
}

impl ValueArgs {
    fn is_empty(&self) -> bool {
        self.ips.is_empty() && self.dcs_port.is_none() && self.android_port.is_none()
    }

    /// Fills flags that were not given from what the script currently holds.
    fn resolve(&self, report: &SettingsReport) -> Result<FieldValues, String> {
        let readings = &report.readings;
        let ips: Vec<String> = if self.ips.is_empty() {
            readings.client_ips().map(<[String]>::to_vec).unwrap_or_default()
        } else {
            self.ips.clone()
        };
        let dcs_port = self
            .dcs_port
            .clone()
            .or_else(|| readings.port(Field::PrimaryPort).map(str::to_string))
            .unwrap_or_default();
        let android_port = self
            .android_port
            .clone()
            .or_else(|| readings.port(Field::SecondaryPort).map(str::to_string))
            .unwrap_or_default();

        FieldValues::parse(&ips, &dcs_port, &android_port).map_err(|e| e.message)
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = config::load(cli.config.as_deref()).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    });
    let saved_games = cli.saved_games.clone().or(config.saved_games.clone());
    let variant = cli.variant.map(to_core_variant).or(config.variant);
    let mut settings = config.scripts.clone();

    if let Command::Variants { json } = &cli.command {
        let saved_games = config::resolve_saved_games(saved_games).unwrap_or_else(|e| {
            eprintln!("Error locating saved games: {e}");
            process::exit(1);
        });
        let found = variant::detect_variants(&saved_games);
        if *json {
            print_json(&render_variants_json(&saved_games, &found));
        } else {
            print!("{}", render_variants_text(&saved_games, &found));
        }
        return;
    }

    if let Command::Update { url: Some(url), .. } = &cli.command {
        settings.archive_url = url.clone();
    }

    if let Command::LocalIp = &cli.command {
        match network::local_ipv4(&settings.probe_addr) {
            Ok(addr) => println!("{addr}"),
            Err(e) => {
                eprintln!("Error determining local address via {}: {e}", settings.probe_addr);
                process::exit(1);
            }
        }
        return;
    }

    let scripts_dir = config::resolve_scripts_dir(
        cli.scripts_dir.clone().or(config.scripts_dir.clone()),
        saved_games,
        variant,
    )
    .unwrap_or_else(|e| {
        eprintln!("Error locating scripts: {e}");
        process::exit(1);
    });
    let installer = Installer::new(scripts_dir, settings);

    let report = installer.read_settings().unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", installer.primary_path().display());
        process::exit(1);
    });

    match &cli.command {
        Command::Show {
            client_ips,
            dcs_port,
            android_port,
            json,
        } => {
            print_warnings(&report);
            let fields = FieldSelection {
                client_ips: *client_ips,
                dcs_port: *dcs_port,
                android_port: *android_port,
            };
            if *json {
                let value = if fields.is_any_selected() {
                    render_settings_selected_json(&report, &fields, JsonStyle::CanonicalV1)
                } else {
                    render_settings_json(&report, JsonStyle::CanonicalV1)
                };
                print_json(&value);
            } else if fields.is_any_selected() {
                for (key, value) in render_settings_selected_pairs(&report, &fields) {
                    println!("{key}={value}");
                }
            } else {
                print!("{}", render_settings_text(&report));
            }
        }
        Command::Apply { values, json } => {
            if values.is_empty() {
                eprintln!("apply requires at least one of --ip, --dcs-port, --android-port");
                process::exit(2);
            }
            let values = values.resolve(&report).unwrap_or_else(|e| {
                eprintln!("Invalid values: {e}");
                process::exit(2);
            });
            print_warnings(&report);
            let outcome = installer.apply(&values).unwrap_or_else(|e| {
                eprintln!("Error applying values: {e}");
                process::exit(1);
            });
            if *json {
                print_json(&render_apply_json(&outcome, JsonStyle::CanonicalV1));
            } else {
                print!("{}", render_apply_text(&outcome));
            }
        }
        Command::Update { values, json, .. } => {
            let values = values.resolve(&report).unwrap_or_else(|e| {
                eprintln!("Invalid values: {e}");
                process::exit(2);
            });
            let staging =
                std::env::temp_dir().join(format!("cockpitpp-installer-{}", process::id()));
            let summary = installer
                .update(&HttpTransport::new(), &staging, &values)
                .unwrap_or_else(|e| {
                    eprintln!("Error updating scripts: {e}");
                    process::exit(1);
                });
            match installer.read_settings() {
                Ok(after) => print_warnings(&after),
                Err(e) => eprintln!("warning: could not re-read installed scripts: {e}"),
            }
            if *json {
                print_json(&render_update_json(&summary));
            } else {
                print!("{}", render_update_text(&summary));
            }
        }
        Command::LocalIp | Command::Variants { .. } => unreachable!("handled above"),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn print_warnings(report: &SettingsReport) {
    for warning in report.warnings() {
        eprintln!("warning: {warning}");
    }
}

fn print_json(value: &JsonValue) {
    let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error rendering JSON output: {e}");
        process::exit(1);
    });
    println!("{rendered}");
}

fn to_core_variant(variant: VariantArg) -> Variant {
    match variant {
        VariantArg::Release => Variant::Release,
        VariantArg::Openbeta => Variant::OpenBeta,
    }
}
