use glam::Vec3;
use ray_tracing_lib::{
    camera::{Camera, RaySource},
    config::Config,
    renderer::{Renderer, Settings},
    scene::{Material, Scene, Sphere},
    texture::RenderTarget,
};

const BACKGROUND: u32 = 0xFF00_0000;

fn red_sphere_scene() -> Scene {
    let mut scene = Scene::default();
    let red = scene.add_material(Material::with_albedo(Vec3::new(1.0, 0.0, 0.0)));
    scene.add_sphere(Sphere {
        position: Vec3::ZERO,
        radius: 1.0,
        material_index: red,
    });
    scene
}

#[test]
fn centre_pixel_sees_the_red_sphere() {
    let scene = red_sphere_scene();
    let mut camera = Camera::new(45.0, 0.1, 100.0);
    camera.look_at(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO);
    camera.resize(9, 9);

    let mut renderer: Renderer = Renderer::default();
    renderer.on_resize(9, 9);
    renderer.render(&scene, &camera);

    let image = renderer.final_image().expect("published after resize");
    let [r, g, b, a] = image.image().get_pixel(4, 4).0;
    assert!(r > 0);
    assert_eq!((g, b, a), (0, 0, 255));

    // 45 degree frustum corners clear a unit sphere three units away
    assert_eq!(image.pixel(0, 0), BACKGROUND);
    assert_eq!(image.pixel(8, 8), BACKGROUND);
}

#[test]
fn light_from_the_upper_right_front_brightens_that_side() {
    let scene = red_sphere_scene();
    let mut camera = Camera::new(45.0, 0.1, 100.0);
    camera.look_at(Vec3::new(0.0, 0.0, 3.0), Vec3::ZERO);
    camera.resize(31, 31);

    let mut renderer: Renderer = Renderer::default();
    renderer.on_resize(31, 31);
    renderer.render(&scene, &camera);

    let image = renderer.final_image().expect("published");
    let red = |x, y| image.pixel(x, y) & 0xFF;
    assert!(red(19, 11) > red(11, 19));
}

#[test]
fn resize_reallocates_only_on_change() {
    let scene = Scene::default_scene();
    let mut camera = Camera::new(45.0, 0.1, 100.0);
    let mut renderer: Renderer = Renderer::new(Settings {
        multithreaded: true,
        ..Default::default()
    });

    for (width, height) in [(16, 8), (16, 8), (5, 7)] {
        camera.resize(width, height);
        renderer.on_resize(width, height);
        renderer.render(&scene, &camera);

        let image = renderer.final_image().expect("published");
        assert_eq!((image.width(), image.height()), (width, height));
        assert_eq!(
            renderer.frame_buffer().data().len(),
            camera.ray_directions().len()
        );
    }
}

#[test]
fn stock_config_renders_to_png() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config_path = dir.path().join("scene.toml");
    let output = dir.path().join("frame.png");
    std::fs::write(
        &config_path,
        format!(
            "[render]\nwidth = 24\nheight = 16\noutput = {:?}\n",
            output.display().to_string()
        ),
    )
    .expect("write config");

    let config = Config::load(&config_path).expect("config loads");
    config.validate().expect("config is valid");

    let mut camera = config.camera();
    camera.resize(config.render.width, config.render.height);
    let mut renderer: Renderer = Renderer::new(config.settings());
    renderer.on_resize(config.render.width, config.render.height);
    renderer.render(&config.scene(), &camera);

    let image = renderer.final_image().expect("published");
    image.save(&config.render.output).expect("png written");

    let decoded = image::open(&output).expect("png decodes").to_rgba8();
    assert_eq!(decoded.dimensions(), (24, 16));
    assert_eq!(decoded.as_raw(), image.image().as_raw());
}

#[test]
fn missing_config_file_is_an_io_error() {
    let err = Config::load("definitely/not/here.toml").expect_err("missing file");
    assert!(matches!(err, ray_tracing_lib::Error::Io { .. }));
}
