#[macro_use]
extern crate log;

mod demo;
mod options;
mod output;

use clap::Parser;
use indicatif::ProgressBar;
use options::*;
use output::*;
use relight_accelerators::*;
use relight_bakers::*;
use relight_core::lightmap::LightmapEncoding;
use relight_core::progress::*;
use relight_core::scene::*;
use std::error::Error;
use std::sync::Arc;

fn main() {
    env_logger::init();

    let options = Options::parse();
    if let Err(err) = run(&options) {
        error!("{err}");
        std::process::exit(1);
    }
}

/// Bakes the demo scene and writes one lightmap per mesh.
///
/// * `options` - Command line options.
fn run(options: &Options) -> Result<(), Box<dyn Error>> {
    let settings = BvhSettings {
        split_method: SplitMethod::from_name(&options.split_method),
        ..BvhSettings::default()
    };
    let mut scene = Scene::new(Box::new(BvhTracer::new(settings)));
    scene.begin()?;
    demo::cornell_box(&mut scene)?;
    scene.end()?;

    scene.attach_lightmaps(options.size, options.size);
    if !options.no_indirect {
        scene.attach_photonmaps(options.size, options.size);
    }
    let scene = Arc::new(scene);
    info!("{} meshes, {} lights", scene.meshes().len(), scene.lights().len());

    let progress: Arc<dyn Progress> = if options.quiet {
        Arc::new(ProgressBar::hidden())
    } else {
        Arc::new(create_progress_bar(0, "Baking"))
    };
    let mut relight = Relight::threaded(options.threads())?.with_progress(progress);
    info!("Baking with {} workers", relight.worker_count());

    relight.bake_direct_light(&scene)?;
    if !options.no_indirect {
        relight.bake_indirect_light(&scene, &options.quality.indirect_light())?;
    }
    if options.radiosity {
        relight.bake_radiosity(&scene, &RadiositySettings::default())?;
    }

    std::fs::create_dir_all(&options.out_dir)?;
    let encoding = LightmapEncoding::from(options.encoding);
    write_all(&scene, options, "", encoding)?;

    if options.ao {
        relight.bake_ambient_occlusion(&scene, &options.quality.ambient_occlusion())?;
        write_all(&scene, options, "_ao", LightmapEncoding::Ldr)?;
    }
    Ok(())
}

/// Writes the lightmap of every mesh.
///
/// * `scene`    - The baked scene.
/// * `options`  - Command line options.
/// * `suffix`   - Appended to the mesh names.
/// * `encoding` - Pixel encoding of 8-bit output.
fn write_all(scene: &Scene, options: &Options, suffix: &str, encoding: LightmapEncoding) -> Result<(), String> {
    for mesh in scene.meshes() {
        if let Some(lightmap) = mesh.lightmap() {
            let path = lightmap_path(&options.out_dir, &mesh.name, suffix, options.format);
            write_lightmap(&path, lightmap, options.format, encoding)?;
        }
    }
    Ok(())
}
