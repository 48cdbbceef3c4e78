use crate::config::load_config;
use crate::dataset::Dataset;
use crate::ir::ViewMode;
use crate::layout::compute_slope_layout;
use crate::layout_dump::write_layout_dump;
use crate::parser::{parse_comp_csv, parse_company_info_csv};
use crate::render::{render_svg, write_output_png, write_output_svg};
use crate::{ChartOptions, select_view};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "payslope", version, about = "Compensation slope charts with collision-free labels")]
pub struct Args {
    /// Compensation CSV or '-' for stdin
    #[arg(short = 'i', long = "input")]
    pub input: Option<PathBuf>,

    /// Company info CSV (Ticker, Name, Industry)
    #[arg(long = "companies")]
    pub companies: Option<PathBuf>,

    /// Which items go in the left column
    #[arg(long = "view", value_enum, default_value = "company")]
    pub view: ViewArg,

    /// Ticker (company view) or role (role view). Defaults to the first one.
    #[arg(long = "item")]
    pub item: Option<String>,

    /// Restrict the role view to one industry
    #[arg(long = "industry")]
    pub industry: Option<String>,

    /// Left item whose ranks are labelled
    #[arg(long = "select")]
    pub select: Option<String>,

    /// Output file (svg/png/json). Defaults to stdout for SVG and JSON.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (chart geometry, theme, themeVariables)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,

    /// Width
    #[arg(short = 'w', long = "width")]
    pub width: Option<f32>,

    /// Height
    #[arg(short = 'H', long = "height")]
    pub height: Option<f32>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewArg {
    Company,
    Role,
}

impl From<ViewArg> for ViewMode {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::Company => ViewMode::Company,
            ViewArg::Role => ViewMode::Role,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Svg,
    Png,
    /// Layout dump instead of a drawing
    Json,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;
    if let Some(width) = args.width {
        config.render.width = width;
    }
    if let Some(height) = args.height {
        config.render.height = height;
    }

    let input = read_input(args.input.as_deref())?;
    let rows = parse_comp_csv(&input)?;
    let companies = match args.companies.as_deref() {
        Some(path) => parse_company_info_csv(&std::fs::read_to_string(path)?)?,
        None => Vec::new(),
    };
    log::info!("loaded {} rows, {} companies", rows.len(), companies.len());
    let dataset = Dataset::new(rows, companies);

    let options = ChartOptions {
        view: args.view.into(),
        item: args.item.clone(),
        industry: args.industry.clone(),
        select: args.select.clone(),
    };
    let (view, selection) = select_view(&dataset, &options)?;
    log::info!(
        "{} view \"{}\": {} left items, {} ranks",
        view.mode.as_str(),
        view.title,
        view.left.len(),
        view.right.len()
    );

    let layout = compute_slope_layout(
        &view,
        &selection,
        &config.theme,
        &config.chart,
        &config.render,
    );
    match args.output_format {
        OutputFormat::Svg => {
            let svg = render_svg(&layout, &config.theme, &config.chart);
            write_output_svg(&svg, args.output.as_deref())?;
        }
        OutputFormat::Png => {
            let output = ensure_output(&args.output, "png")?;
            let svg = render_svg(&layout, &config.theme, &config.chart);
            write_output_png(&svg, &output, &config.render)?;
        }
        OutputFormat::Json => {
            write_layout_dump(args.output.as_deref(), &layout)?;
        }
    }
    Ok(())
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path.filter(|path| *path != Path::new("-")) {
        return Ok(std::fs::read_to_string(path)?);
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn ensure_output(output: &Option<PathBuf>, ext: &str) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.clone());
    }
    Err(anyhow::anyhow!("Output path required for {} output", ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_command_line() {
        let args = Args::try_parse_from([
            "payslope",
            "-i",
            "comp.csv",
            "--companies",
            "info.csv",
            "--view",
            "role",
            "--item",
            "software-engineer",
            "--industry",
            "Software",
            "--select",
            "MSFT",
            "-e",
            "json",
            "-w",
            "1200",
        ])
        .unwrap();
        assert_eq!(args.view, ViewArg::Role);
        assert_eq!(ViewMode::from(args.view), ViewMode::Role);
        assert_eq!(args.output_format, OutputFormat::Json);
        assert_eq!(args.select.as_deref(), Some("MSFT"));
        assert_eq!(args.width, Some(1200.0));
        assert_eq!(args.height, None);
    }

    #[test]
    fn defaults_to_company_svg() {
        let args = Args::try_parse_from(["payslope"]).unwrap();
        assert_eq!(args.view, ViewArg::Company);
        assert_eq!(args.output_format, OutputFormat::Svg);
        assert!(args.input.is_none());
    }

    #[test]
    fn png_needs_an_output_path() {
        let err = ensure_output(&None, "png").unwrap_err();
        assert!(err.to_string().contains("png"));
        assert_eq!(
            ensure_output(&Some(PathBuf::from("chart.png")), "png").unwrap(),
            PathBuf::from("chart.png")
        );
    }
}
