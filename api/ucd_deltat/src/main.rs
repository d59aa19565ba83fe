use std::env;
use std::path::Path;
use ucd_deltat::{colorize, DeltaTTable, DeltaTVariable, RegionCollection, ScatterSeries, DEFAULT_REGION};

fn main() -> Result<(), anyhow::Error> {
    pretty_env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <command> [args...]", args[0]);
        eprintln!("Commands:");
        eprintln!("  variables - List the ΔT variables");
        eprintln!("  regions <csv> - List the distinct region names");
        eprintln!("  colors <geojson> [variable] - Print the bucket color of every region");
        eprintln!("  scatter <csv> [region] - Print the day/night points of a region");
        eprintln!("  export <geojson> <variable> <output> - Write the colored GeoJSON");
        eprintln!("");
        eprintln!("Examples:");
        eprintln!("  {} colors UCD_DeltaT.geojson DeltaT_Summer_Night_mean", args[0]);
        eprintln!("  {} scatter UCD_DeltaT.csv \"Karlsruhe [DEU]\"", args[0]);
        std::process::exit(1);
    }

    let command = &args[1];

    match command.as_str() {
        "variables" => {
            for variable in DeltaTVariable::ALL {
                let marker = if variable == DeltaTVariable::default() { " (default)" } else { "" };
                println!("  {:<26} {}{}", variable.key(), variable.label(), marker);
            }
        }
        "regions" => {
            let path = required(&args, 2, "csv path");
            let table = DeltaTTable::load(Path::new(path))?;
            let names = table.region_names();
            println!("Found {} regions:", names.len());
            for name in &names {
                println!("  {}", name);
            }
        }
        "colors" => {
            let path = required(&args, 2, "geojson path");
            let variable = match args.get(3) {
                Some(key) => key.parse()?,
                None => DeltaTVariable::default(),
            };
            let regions = RegionCollection::load(Path::new(path))?;
            let colored = colorize(&regions, variable);
            println!("{} regions colored by {}:", colored.len(), variable.label());
            for region in &colored.regions {
                println!(
                    "  {:<40} {:>10} {}",
                    region.label(),
                    ucd_deltat::format_value(region.value),
                    region.color()
                );
            }
        }
        "scatter" => {
            let path = required(&args, 2, "csv path");
            let region = args.get(3).map(String::as_str).unwrap_or(DEFAULT_REGION);
            let table = DeltaTTable::load(Path::new(path))?;
            let series = ScatterSeries::from_rows(region, &table.filter_region(region));
            println!("{}", series.title);
            if series.is_empty() {
                println!("  No data");
            }
            for point in &series.points {
                println!("  {:<7} day {:>8.3}  night {:>8.3}", point.season.name(), point.day, point.night);
            }
        }
        "export" => {
            let path = required(&args, 2, "geojson path");
            let variable: DeltaTVariable = required(&args, 3, "variable").parse()?;
            let output = required(&args, 4, "output path");
            let regions = RegionCollection::load(Path::new(path))?;
            let colored = colorize(&regions, variable);
            std::fs::write(output, colored.to_geojson_string()?)?;
            println!("Wrote {} colored regions to {}", colored.len(), output);
        }
        _ => {
            eprintln!("Unknown command: {}", command);
            std::process::exit(1);
        }
    }

    Ok(())
}

fn required<'a>(args: &'a [String], index: usize, what: &str) -> &'a str {
    match args.get(index) {
        Some(value) => value.as_str(),
        None => {
            eprintln!("Missing {}", what);
            std::process::exit(1);
        }
    }
}
