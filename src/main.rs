use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use medscope::config::{DashboardConfig, ExportColumns};
use medscope::export::{FILTERED_FILE_NAME, SUMMARY_FILE_NAME};
use medscope::report::Snapshot;
use medscope::{Session, SpecialtyFilter};

#[derive(Parser)]
#[command(name = "medscope")]
#[command(about = "Explore medical transcription datasets")]
#[command(version)]
struct Cli {
    /// TOML file overriding the default limits and policies
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print statistics, rankings and a preview for a dataset
    Analyze {
        /// CSV or JSON dataset
        file: PathBuf,
        /// Restrict to one medical specialty ("All" for everything)
        #[arg(long, default_value = "All")]
        specialty: String,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
        /// Rows in the data preview (5-50)
        #[arg(long)]
        rows: Option<usize>,
    },
    /// List the values accepted by --specialty
    Specialties {
        file: PathBuf,
    },
    /// Write the summary and filtered-data CSV files
    Export {
        file: PathBuf,
        #[arg(long, default_value = "All")]
        specialty: String,
        /// Directory receiving the CSV files
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
        /// Export only the preview columns instead of every column
        #[arg(long)]
        display_columns: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn open_session(config: DashboardConfig, file: &Path, specialty: &str) -> Result<Session> {
    let mut session = Session::new(config);
    session
        .open(file)
        .with_context(|| format!("loading {}", file.display()))?;
    session.set_filter(SpecialtyFilter::parse(specialty));
    Ok(session)
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = DashboardConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            file,
            specialty,
            format,
            rows,
        } => {
            let session = open_session(config, &file, &specialty)?;
            let snapshot =
                Snapshot::capture(&session, rows).context("no dataset loaded")?;
            match format {
                Format::Text => print!("{}", snapshot.render_text()),
                Format::Json => println!("{}", snapshot.to_json()?),
            }
        }
        Commands::Specialties { file } => {
            let session = open_session(config, &file, "All")?;
            for option in session.specialty_options() {
                println!("{option}");
            }
        }
        Commands::Export {
            file,
            specialty,
            out_dir,
            display_columns,
        } => {
            let mut config = config;
            if display_columns {
                config.export_columns = ExportColumns::Display;
            }
            let session = open_session(config, &file, &specialty)?;
            fs::create_dir_all(&out_dir)
                .with_context(|| format!("creating {}", out_dir.display()))?;

            let summary = session.export_summary().context("no dataset loaded")??;
            let summary_path = out_dir.join(SUMMARY_FILE_NAME);
            fs::write(&summary_path, summary)
                .with_context(|| format!("writing {}", summary_path.display()))?;

            let filtered = session.export_filtered().context("no dataset loaded")??;
            let filtered_path = out_dir.join(FILTERED_FILE_NAME);
            fs::write(&filtered_path, filtered)
                .with_context(|| format!("writing {}", filtered_path.display()))?;

            log::info!(
                "Exported {} records to {}",
                session.view().map(|v| v.len()).unwrap_or(0),
                filtered_path.display()
            );
            println!("Wrote {}", summary_path.display());
            println!("Wrote {}", filtered_path.display());
        }
    }
    Ok(())
}
