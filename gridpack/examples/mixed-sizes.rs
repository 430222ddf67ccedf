use std::path::Path;

use gridpack::{GridPacker, GridSpec, PlacementReport, Size};

fn main() {
    env_logger::init();

    let inputs = vec![Size::new(16, 16), Size::new(32, 24), Size::new(8, 40)];

    let packer = GridPacker::new(GridSpec::Auto).vertical(true);
    let layout = packer.pack(inputs).expect("inputs should not be empty");

    let names: Vec<String> = ["small.png", "wide.png", "tall.png"]
        .iter()
        .map(|name| name.to_string())
        .collect();
    let report = PlacementReport::new(&layout, &names, Path::new("sprite.png"));

    println!("Pack result: {:#?}", report);
}
