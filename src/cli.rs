use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::{debug, info};

use dombind_index::{CorpusRegistry, CorpusSource, DeclarationIndex, DeclarationSource};
use dombind_parser::{ParseWarning, parse_interface_with_warnings};
use dombind_resolver::{BindingRequest, BindingSurface, ResolveError};
use dombind_utils::{Diagnostic, emit_diagnostics, init_logging};

use crate::config::Config;
use crate::output::OutputFormat;
use crate::utils::profiler::{PhaseTiming, Profiler};
use crate::version::VERSION;

#[derive(Parser, Debug)]
#[command(name = "dombind", version = VERSION, about = "Browser API binding surface generator")]
pub struct DombindCli {
    #[arg(long, global = true)]
    /// Path to a dombind.toml (defaults to ./dombind.toml, then the user config dir).
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    /// Declaration corpus: `embedded`, a file path, or an http(s) URL.
    corpus: Option<String>,

    #[arg(long, global = true, value_enum)]
    /// Output document format.
    format: Option<OutputFormat>,

    #[arg(long, global = true)]
    /// Display phase timing information.
    time: bool,

    #[arg(long, global = true)]
    /// Report interface members that were skipped while parsing.
    warn_skipped: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolves one interface and prints its binding surface.
    Resolve {
        type_name: String,
        /// JavaScript path of the implementation (defaults to `window.<type>`).
        #[arg(long)]
        implementation: Option<String>,
        /// Leave methods that need callback bridging out of the root interface.
        #[arg(long)]
        only_pure: bool,
        /// Also resolve the interfaces named in `extends` clauses.
        #[arg(long)]
        follow_extends: bool,
    },
    /// Parses a single interface declaration file and prints its descriptor.
    Parse { path: PathBuf },
    /// Lists the interfaces in the corpus.
    List {
        #[arg(long)]
        filter: Option<String>,
    },
    /// Writes a binding surface for every `[[binding]]` in the config.
    Generate {
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

impl DombindCli {
    pub fn command(&self) -> &Command {
        &self.command
    }
}

pub fn run() -> Result<()> {
    let cli = DombindCli::parse();
    let config = Config::load(cli.config.as_deref())?;
    init_logging(&config.log.level);
    debug!(?cli, "dombind starting");

    let settings = Settings::from_cli(&cli, &config)?;
    match &cli.command {
        Command::Resolve {
            type_name,
            implementation,
            only_pure,
            follow_extends,
        } => {
            let mut request = BindingRequest {
                implementation: implementation.clone(),
                only_pure: *only_pure,
                ..BindingRequest::new(type_name.as_str())
            };
            request.resolve.follow_extends = *follow_extends;
            handle_resolve(&settings, &config, &request)
        }
        Command::Parse { path } => handle_parse(&settings, path),
        Command::List { filter } => handle_list(&settings, filter.as_deref()),
        Command::Generate { out } => handle_generate(&settings, &config, out.clone()),
    }
}

struct Settings {
    corpus: CorpusSource,
    format: OutputFormat,
    output_dir: PathBuf,
    time: bool,
    warn_skipped: bool,
}

impl Settings {
    fn from_cli(cli: &DombindCli, config: &Config) -> Result<Self> {
        let corpus = match &cli.corpus {
            Some(value) => value
                .parse()
                .map_err(anyhow::Error::msg)
                .context("invalid --corpus")?,
            None => config.corpus.source.clone(),
        };
        Ok(Self {
            corpus,
            format: cli.format.unwrap_or(config.output.format),
            output_dir: config.output.dir.clone(),
            time: cli.time,
            warn_skipped: cli.warn_skipped,
        })
    }
}

fn load_index(settings: &Settings, profiler: &mut Profiler) -> Result<Arc<DeclarationIndex>> {
    let index = profiler.record_phase("Corpus", || {
        CorpusRegistry::global().load(&settings.corpus)
    })?;
    info!(
        source = %index.key(),
        fingerprint = index.fingerprint(),
        interfaces = index.interface_count(),
        "corpus ready"
    );
    Ok(index)
}

fn handle_resolve(settings: &Settings, config: &Config, request: &BindingRequest) -> Result<()> {
    let mut profiler = Profiler::new();
    let index = load_index(settings, &mut profiler)?;
    let mapper = config.type_mapper();
    let request = config.request_for(request);

    if settings.warn_skipped {
        report_skipped_members(&*index, &request.type_name);
    }

    let surface = profiler
        .record_phase("Resolve", || {
            BindingSurface::assemble(&request, &*index, &mapper)
        })
        .map_err(describe_resolve_error)?;

    let document = profiler.record_phase("Render", || settings.format.render(&surface))?;
    println!("{document}");
    print_summary(&surface);

    if settings.time {
        print_timings(profiler.phases());
    }
    Ok(())
}

fn handle_parse(settings: &Settings, path: &Path) -> Result<()> {
    let mut profiler = Profiler::new();
    let source = read_source(path)?;
    let parsed = profiler
        .record_phase("Parsing", || parse_interface_with_warnings(&source))
        .with_context(|| format!("failed to parse {}", path.display()))?;

    if settings.warn_skipped {
        emit_warnings(&path.display().to_string(), &source, &parsed.warnings);
    }

    let document = settings.format.render(&parsed.descriptor)?;
    println!("{document}");
    eprintln!(
        "{} {} ({} properties, {} methods)",
        "parsed".green().bold(),
        parsed.descriptor.name,
        parsed.descriptor.properties.len(),
        parsed.descriptor.methods.len()
    );

    if settings.time {
        print_timings(profiler.phases());
    }
    Ok(())
}

fn handle_list(settings: &Settings, filter: Option<&str>) -> Result<()> {
    let mut profiler = Profiler::new();
    let index = load_index(settings, &mut profiler)?;
    let needle = filter.map(str::to_lowercase);

    let names: Vec<&str> = index
        .interface_names()
        .into_iter()
        .filter(|name| {
            needle
                .as_deref()
                .is_none_or(|needle| name.to_lowercase().contains(needle))
        })
        .collect();

    for name in &names {
        println!("{name}");
    }
    eprintln!(
        "{} {} of {} interfaces in {}",
        "listed".green().bold(),
        names.len(),
        index.interface_count(),
        index.key()
    );

    if settings.time {
        print_timings(profiler.phases());
    }
    Ok(())
}

fn handle_generate(settings: &Settings, config: &Config, out: Option<PathBuf>) -> Result<()> {
    if config.bindings.is_empty() {
        bail!("no [[binding]] entries in the configuration");
    }

    let mut profiler = Profiler::new();
    let index = load_index(settings, &mut profiler)?;
    let mapper = config.type_mapper();
    let out_dir = out.unwrap_or_else(|| settings.output_dir.clone());
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;

    for binding in &config.bindings {
        let request = config.request_for(binding);
        if settings.warn_skipped {
            report_skipped_members(&*index, &request.type_name);
        }

        let surface = profiler
            .record_phase(&request.type_name, || {
                BindingSurface::assemble(&request, &*index, &mapper)
            })
            .map_err(describe_resolve_error)?;

        let path = out_dir.join(format!(
            "{}.{}",
            surface.type_name,
            settings.format.extension()
        ));
        let document = settings.format.render(&surface)?;
        fs::write(&path, document)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("{} {}", "generated".green().bold(), path.display());
    }

    if settings.time {
        print_timings(profiler.phases());
    }
    Ok(())
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn describe_resolve_error(err: ResolveError) -> anyhow::Error {
    if let Some(suggestion) = err.suggestion() {
        eprintln!("{} try `dombind resolve {suggestion}`", "hint".yellow().bold());
    }
    anyhow::Error::new(err)
}

/// Parses the root declaration once more to surface what the parser skipped.
fn report_skipped_members(index: &dyn DeclarationSource, type_name: &str) {
    let Some(raw) = index.try_get_declaration(type_name) else {
        return;
    };
    if let Ok(parsed) = parse_interface_with_warnings(raw) {
        emit_warnings(type_name, raw, &parsed.warnings);
    }
}

fn emit_warnings(source_id: &str, source: &str, warnings: &[ParseWarning]) {
    if warnings.is_empty() {
        return;
    }
    let diagnostics: Vec<Diagnostic> = warnings
        .iter()
        .map(|warning| warning.to_diagnostic(source_id))
        .collect();
    emit_diagnostics(&diagnostics, source);
}

fn print_summary(surface: &BindingSurface) {
    let (pure, bridged) = surface
        .root()
        .map(|root| {
            root.methods.iter().fold((0, 0), |(pure, bridged), method| {
                match method.is_pure() {
                    Some(false) => (pure, bridged + 1),
                    _ => (pure + 1, bridged),
                }
            })
        })
        .unwrap_or_default();

    eprintln!(
        "{} {} ({} types, {} pure, {} bridged)",
        "resolved".green().bold(),
        surface.type_name,
        surface.interfaces.len(),
        pure,
        bridged
    );
    if !surface.unresolved.is_empty() {
        eprintln!(
            "{} {}",
            "unresolved".yellow().bold(),
            surface.unresolved.join(", ")
        );
    }
}

fn print_timings(phases: &[PhaseTiming]) {
    eprintln!("{}", "[Timing]".bold());
    let mut total = Duration::ZERO;
    for PhaseTiming { name, duration } in phases {
        eprintln!("{:>16}: {:>6.2} ms", name, duration.as_secs_f64() * 1000.0);
        total += *duration;
    }
    eprintln!("{:>16}: {:>6.2} ms", "Total", total.as_secs_f64() * 1000.0);
}
