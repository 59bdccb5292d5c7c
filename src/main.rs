use std::path::PathBuf;
use std::process;

use clap::Parser;

use plandoc::{write_plan_file, PlanConfig};

#[derive(Parser)]
#[command(name = "plandoc")]
#[command(version)]
#[command(about = "Generate the churn-prediction project-plan PDF")]
struct Cli {
    /// Output PDF path
    #[arg(value_name = "OUTPUT", default_value = "Churn_Prediction_Project_Plan.pdf")]
    output: PathBuf,

    /// Bottom margin for automatic page breaks, in millimeters
    #[arg(long, default_value_t = 15.0)]
    break_margin: f64,

    /// Body line height, in millimeters
    #[arg(long, default_value_t = 7.0)]
    line_height: f64,

    /// Title font size, in points
    #[arg(long, default_value_t = 16.0)]
    title_size: f64,

    /// Body font size, in points
    #[arg(long, default_value_t = 12.0)]
    body_size: f64,

    /// Compress page content streams
    #[arg(long)]
    compress: bool,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let config = PlanConfig {
        output_path: cli.output,
        break_margin: cli.break_margin,
        line_height: cli.line_height,
        title_size: cli.title_size,
        body_size: cli.body_size,
        compress: cli.compress,
        ..Default::default()
    };

    match write_plan_file(&config) {
        Ok(path) => println!("{}", path.display()),
        Err(err) => {
            eprintln!("error: {err}");
            process::exit(1);
        }
    }
}
