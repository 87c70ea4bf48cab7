//! Runs the whole pipeline on a synthetic dataset: aggregate yearly counts,
//! render a map and bar chart per year, composite the frames, downscale them
//! and stitch them into a looping GIF.
//!
//! To run: cargo run --example make_animation

use gagetrends::{
    assemble_gif, compose_frame, render_bar_chart, render_site_map, resize_frames,
    yearly_site_counts, GageRecord, SiteLocation, StatePolygon,
};
use std::error::Error;
use std::path::Path;

fn main() -> Result<(), Box<dyn Error>> {
    // A handful of gages blinking in and out over three decades.
    let sites = vec![
        SiteLocation::new("05553700", -88.7, 41.3),
        SiteLocation::new("05558300", -89.5, 41.1),
        SiteLocation::new("05586100", -90.5, 39.7),
        SiteLocation::new("03339000", -87.6, 40.1),
    ];
    let mut records = Vec::new();
    for (i, site) in sites.iter().enumerate() {
        for year in (1950 + i as i32)..=(1970 + 2 * i as i32) {
            records.push(GageRecord::new(site.site_id.clone(), year));
        }
    }

    let state = StatePolygon::new(
        "Illinois",
        vec![vec![
            (-91.5, 37.0),
            (-87.5, 37.0),
            (-87.5, 42.5),
            (-91.5, 42.5),
        ]],
    );

    let counts = yearly_site_counts(&records)?;
    println!("Aggregated {} yearly counts.", counts.len());

    let out_dir = Path::new("out");
    let mut frames = Vec::new();
    for yearly in &counts {
        let map = render_site_map(
            std::slice::from_ref(&state),
            &sites,
            &records,
            yearly.year,
            1000,
            600,
        )?;
        let bar = render_bar_chart(&counts, yearly.year, 1000, 220)?;
        frames.push(compose_frame(&map, &bar, yearly.year, out_dir)?);
    }
    println!("Composited {} frames under {}.", frames.len(), out_dir.display());

    let small = resize_frames()
        .frames(&frames)
        .output_dir(Path::new("out/small"))
        .percent(50.0)
        .call()?;

    let gif = assemble_gif()
        .frames(&small)
        .output(Path::new("out/gage_time.gif"))
        .delay_cs(20)
        .call()?;
    println!("Wrote animation to {}.", gif.display());

    Ok(())
}
