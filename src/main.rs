use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use log::{error, info};
use pbr::ProgressBar;
use simplelog::{ColorChoice, Config as LogConfig, LevelFilter, TermLogger, TerminalMode};
use structopt::StructOpt;

use radiant::camera::PinholeCamera;
use radiant::config::{self, RenderSettings, RendererKind};
use radiant::film::Film;
use radiant::materials::{DiffuseLight, Lambertian, MaterialEnum};
use radiant::math::{luminance, Color, Point3, Vec3};
use radiant::renderer::{McmcRenderer, PathTracingRenderer, Renderer};
use radiant::scene::Scene;

#[derive(StructOpt)]
#[structopt(name = "radiant", about = "Path tracing and PSSMLT light transport")]
struct Opt {
    /// TOML render settings; built-in defaults when omitted
    #[structopt(short, long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Override the number of render stages
    #[structopt(short, long)]
    stages: Option<u32>,

    /// Output image path
    #[structopt(short, long, default_value = "output.png", parse(from_os_str))]
    output: PathBuf,

    /// Verbose logging
    #[structopt(short, long)]
    verbose: bool,
}

/// Closed Cornell-style box with the camera inside, looking at the back
/// wall. Quad normals face the interior.
fn cornell_box(aspect: f32) -> (Scene, PinholeCamera) {
    let mut scene = Scene::new();
    let white = scene.add_material(MaterialEnum::Lambertian(Lambertian::new(Color::splat(0.73))));
    let red = scene.add_material(MaterialEnum::Lambertian(Lambertian::new(Color::new(
        0.65, 0.05, 0.05,
    ))));
    let green = scene.add_material(MaterialEnum::Lambertian(Lambertian::new(Color::new(
        0.12, 0.45, 0.15,
    ))));
    let light = scene.add_material(MaterialEnum::DiffuseLight(DiffuseLight::new(Color::new(
        17.0, 12.0, 4.0,
    ))));

    // floor
    scene.add_quad(
        [
            Point3::new(-1.0, 0.0, -1.0),
            Point3::new(-1.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 0.0, -1.0),
        ],
        white,
    );
    // ceiling
    scene.add_quad(
        [
            Point3::new(-1.0, 2.0, -1.0),
            Point3::new(1.0, 2.0, -1.0),
            Point3::new(1.0, 2.0, 1.0),
            Point3::new(-1.0, 2.0, 1.0),
        ],
        white,
    );
    // back wall
    scene.add_quad(
        [
            Point3::new(-1.0, 0.0, -1.0),
            Point3::new(1.0, 0.0, -1.0),
            Point3::new(1.0, 2.0, -1.0),
            Point3::new(-1.0, 2.0, -1.0),
        ],
        white,
    );
    // front wall, behind the camera
    scene.add_quad(
        [
            Point3::new(-1.0, 0.0, 1.0),
            Point3::new(-1.0, 2.0, 1.0),
            Point3::new(1.0, 2.0, 1.0),
            Point3::new(1.0, 0.0, 1.0),
        ],
        white,
    );
    // left wall, red
    scene.add_quad(
        [
            Point3::new(-1.0, 0.0, -1.0),
            Point3::new(-1.0, 2.0, -1.0),
            Point3::new(-1.0, 2.0, 1.0),
            Point3::new(-1.0, 0.0, 1.0),
        ],
        red,
    );
    // right wall, green
    scene.add_quad(
        [
            Point3::new(1.0, 0.0, -1.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(1.0, 2.0, 1.0),
            Point3::new(1.0, 2.0, -1.0),
        ],
        green,
    );
    // ceiling light, slightly below the ceiling
    scene.add_quad(
        [
            Point3::new(-0.4, 1.998, -0.4),
            Point3::new(0.4, 1.998, -0.4),
            Point3::new(0.4, 1.998, 0.4),
            Point3::new(-0.4, 1.998, 0.4),
        ],
        light,
    );

    let camera = PinholeCamera::new(
        Point3::new(0.0, 1.0, 0.85),
        Point3::new(0.0, 1.0, -1.0),
        Vec3::Y,
        65.0,
        aspect,
    );
    (scene, camera)
}

fn write_png(film: &Film<Color>, path: &Path) -> Result<(), image::ImageError> {
    let total: f32 = film.buffer.iter().map(|c| luminance(*c)).sum();
    let avg = total / film.total_pixels() as f32;
    let exposure = if avg > 0.0 { 0.5 / avg } else { 1.0 };
    info!("average luminance {}, exposure {}", avg, exposure);

    let mut img: image::RgbImage =
        image::ImageBuffer::new(film.width as u32, film.height as u32);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        let c = film.at(x as usize, y as usize) * exposure;
        let to_srgb = |v: f32| (v.clamp(0.0, 1.0).powf(1.0 / 2.2) * 255.0) as u8;
        *pixel = image::Rgb([to_srgb(c.x), to_srgb(c.y), to_srgb(c.z)]);
    }
    img.save(path)
}

fn main() {
    let opt = Opt::from_args();
    let level = if opt.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(level, LogConfig::default(), TerminalMode::Mixed, ColorChoice::Auto)
        .expect("logger init");

    let settings: RenderSettings = match &opt.config {
        Some(path) => match config::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
        None => {
            let mut settings = RenderSettings::new(512, 512);
            settings.max_path_length = 6;
            settings
        }
    };
    let stages = opt.stages.unwrap_or(settings.stages);

    rayon::ThreadPoolBuilder::new()
        .num_threads(num_cpus::get())
        .build_global()
        .expect("rayon pool init");

    let aspect = settings.width as f32 / settings.height as f32;
    let (scene, camera) = cornell_box(aspect);
    let scene = Arc::new(scene);

    let mut renderer: Box<dyn Renderer> = match settings.renderer {
        RendererKind::Pt => match PathTracingRenderer::new(scene, camera, &settings) {
            Ok(renderer) => Box::new(renderer),
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
        RendererKind::Mcmc => match McmcRenderer::new(scene, camera, &settings) {
            Ok(renderer) => Box::new(renderer),
            Err(e) => {
                error!("{}", e);
                std::process::exit(1);
            }
        },
    };

    info!(
        "rendering {}x{} with {:?}, {} stages",
        settings.width, settings.height, settings.renderer, stages
    );
    let now = Instant::now();
    let mut progress = ProgressBar::new(stages as u64);
    for _ in 0..stages {
        renderer.render_stage();
        progress.inc();
    }
    progress.finish();
    let elapsed = now.elapsed().as_millis() as f32 / 1000.0;
    info!("render took {:.2}s", elapsed);
    renderer.profile().log_summary(elapsed);

    let film = renderer.get_output();
    if let Err(e) = write_png(&film, &opt.output) {
        error!("failed to write image: {}", e);
        std::process::exit(1);
    }
    info!("wrote {}", opt.output.display());
}
