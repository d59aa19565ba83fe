use openstreetmap::{OpenStreetMapAPI, Viewport};
use std::env;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    pretty_env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 6 {
        eprintln!("Usage: {} <lat> <lon> <zoom> <width> <height> [output.png]", args[0]);
        eprintln!("");
        eprintln!("Example:");
        eprintln!("  {} 49.3 8.45 9 960 600 basemap.png", args[0]);
        std::process::exit(1);
    }

    let viewport = Viewport::new(
        args[1].parse()?,
        args[2].parse()?,
        args[3].parse()?,
        args[4].parse()?,
        args[5].parse()?,
    );
    let output_path = args.get(6).map(String::as_str).unwrap_or("output.png");

    println!("Viewport: {:?}", viewport);
    println!("Bounding box: {:?}", viewport.bounding_box());

    let api = OpenStreetMapAPI::new();
    match api.save_viewport(&viewport, Path::new(output_path)).await {
        Ok(_) => {
            println!("Successfully downloaded and saved basemap!");
        }
        Err(e) => {
            println!("Error downloading basemap: {}", e);
        }
    }

    Ok(())
}
