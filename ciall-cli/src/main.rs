//! Linha de comando do pipeline de etiquetagem semântica do irlandês.
//!
//! ```text
//! ciall -c ciall_conf.yaml -i entrada.tsv -o saida.tsv
//! ciall -c ciall_conf.yaml -i teste.tsv -A      # relatório de acurácia
//! cat entrada.cg3 | ciall -C                     # saída + cobertura
//! ```

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use ciall_core::{CiallPipeline, Coverage, InputFormat, PipelineConfig};
use clap::Parser;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "ciall")]
#[command(about = "Pipeline de etiquetagem semântica do irlandês")]
struct Args {
    /// Arquivo de configuração YAML
    #[arg(short, long, default_value = "ciall_conf.yaml")]
    config: PathBuf,

    /// Arquivo de entrada (padrão: STDIN)
    #[arg(short, long)]
    infile: Option<PathBuf>,

    /// Arquivo de saída (padrão: STDOUT)
    #[arg(short, long)]
    outfile: Option<PathBuf>,

    /// Imprime a cobertura da etiquetagem semântica
    #[arg(short = 'C', long)]
    coverage: bool,

    /// Avalia a acurácia usando a entrada (TSV com coluna EXPECTED_USAS) como teste;
    /// imprime o relatório em vez da saída TSV
    #[arg(short = 'A', long)]
    accuracy: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Erro: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn read_input(infile: Option<&PathBuf>) -> anyhow::Result<Option<String>> {
    let input = match infile {
        Some(path) => {
            if !path.is_file() {
                eprintln!("Arquivo de entrada não existe: {}", path.display());
                return Ok(None);
            }
            fs::read_to_string(path)
                .with_context(|| format!("falha ao ler {}", path.display()))?
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("falha ao ler STDIN")?;
            buf
        }
    };
    if input.is_empty() {
        eprintln!("Nenhum dado de entrada!");
        return Ok(None);
    }
    Ok(Some(input))
}

fn run(args: &Args) -> anyhow::Result<ExitCode> {
    let Some(input) = read_input(args.infile.as_ref())? else {
        return Ok(ExitCode::FAILURE);
    };

    let config = PipelineConfig::from_file(&args.config)
        .with_context(|| format!("falha ao ler a configuração {}", args.config.display()))?;

    if args.accuracy && config.input.format != InputFormat::Tsv {
        bail!("o modo de acurácia exige entrada TSV");
    }
    let output_fields = if args.accuracy {
        Vec::new()
    } else {
        match config.output_fields() {
            Ok(fields) => fields,
            Err(err) => {
                eprintln!("{err}");
                return Ok(ExitCode::FAILURE);
            }
        }
    };

    let pipeline = CiallPipeline::from_config(&config, args.accuracy)?;
    let freqs = config.lemma_frequency()?;
    let doc = config
        .input
        .format
        .read(&input, &config.input_fields()?, &freqs)?;
    info!(tokens = doc.len(), "documento lido");

    let doc = pipeline.run(doc)?;

    if args.accuracy {
        match &doc.accuracy_report {
            Some(report) if report.num_tokens() > 0 => println!("{}", report.summary()),
            _ => warn!("nenhum token com EXPECTED_USAS na entrada"),
        }
    } else {
        let tsv = ciall_core::tsv::document_to_tsv(&doc, &output_fields)?;
        match &args.outfile {
            Some(path) => fs::write(path, tsv)
                .with_context(|| format!("falha ao escrever {}", path.display()))?,
            None => print!("{tsv}"),
        }
    }

    if args.coverage {
        println!("{}", Coverage::of(&doc.tokens));
    }

    Ok(ExitCode::SUCCESS)
}
