// intro.rs
//
// The hexagon logo intro:
//   1. the middle hex contour grows from its center, then spins once;
//   2. three satellite contours appear and slide out to NE, W and SE;
//   3. once everything has settled, a fill mask sweeps in diagonally to reveal
//      the colored, image-filled hexes while the text block slides open;
//   4. the satellites then act as hover/click links.
// A key listener skips to the end state at any point.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use zap_motion::math::rotate;
use zap_motion::render::DEFAULT_LINE_WIDTH;
use zap_motion::{
    NavigationStyle, Process, ProcessId, Rect, Result, Scene, Scheduler, Shape, ShapeId, Stage,
    Visual,
};

use crate::config::{HexContent, IntroConfig};

/// Handles to everything the intro builds.
#[derive(Debug, Clone)]
pub struct Intro {
    /// Middle contour, generated and spun in place.
    pub hex_mid: ShapeId,
    /// Satellite contours in NE, W, SE order; the navigation targets.
    pub satellites: [ShapeId; 3],
    /// Offsets the satellites slide to, same order.
    pub satellite_offsets: [Vec2; 3],
    /// Invisible clip revealing the filled hexes.
    pub fill_mask: ShapeId,
    /// Filled hexes under the mask: middle, NE, W, SE.
    pub fills: [ShapeId; 4],
    /// Invisible clip revealing the two text lines.
    pub text_rect: ShapeId,
    /// Root of the intro's process tree.
    pub timeline: ProcessId,
    /// Skip-to-end key listener.
    pub skip: ProcessId,
}

/// Spawn the intro's shapes into `scheduler`'s stage and enqueue its
/// processes. Only the middle contour and the (still empty) text block are
/// live at first; everything else is shown by the timeline.
pub fn build(config: &IntroConfig, scheduler: &mut Scheduler) -> Result<Intro> {
    config.validate()?;
    let t = &config.timing;
    let d = t.hex_diameter;
    let contour_visual = || Visual::stroke(config.primary_color.clone(), DEFAULT_LINE_WIDTH);

    let base = Vec2::new(d, 0.0);
    let offset_ne = rotate(base, PI / 3.0);
    let offset_w = rotate(base, PI);
    let offset_se = rotate(base, 5.0 * PI / 3.0);

    let stage = scheduler.stage_mut();

    let hex_mid = stage.spawn_live(Shape::empty().with_visual(contour_visual()));
    let satellite = |stage: &mut Stage, content: &HexContent| {
        let mut hex = Shape::hex(0.0, 0.0, d).with_visual(contour_visual());
        hex.url = content.url.clone();
        stage.spawn(hex)
    };
    let hex_ne = satellite(stage, &config.shapes[1]);
    let hex_w = satellite(stage, &config.shapes[2]);
    let hex_se = satellite(stage, &config.shapes[3]);

    let flip = Vec2::new(-1.0, 1.0);
    let fill_mask = stage.spawn(Shape::empty().with_scale(flip).without_visual());
    let mut fills = [hex_mid; 4];
    for (i, offset) in [Vec2::ZERO, offset_ne, offset_w, offset_se].into_iter().enumerate() {
        let fill = stage.spawn(
            Shape::hex(0.0, 0.0, d)
                .with_scale(flip)
                .with_translation(offset)
                .with_visual(contour_visual()),
        );
        stage.scene.attach(fill_mask, fill);
        add_fill_content(&mut stage.scene, fill, &config.shapes[i], d);
        fills[i] = fill;
    }

    let (tw, th) = (t.text_rect_width, t.text_rect_height);
    let text_rect = stage.spawn_live(
        Shape::empty()
            .without_visual()
            .with_translation(Vec2::new(60.0, -th * 0.5)),
    );
    let text_line = |text: &str, font: &str, translation: Vec2, scale: Vec2| {
        Shape::rect(0.0, 0.0, tw, th * 0.5)
            .with_visual(Visual::text(text, font, config.primary_color.clone()))
            .with_translation(translation)
            .with_scale(scale)
    };
    let primary = stage.spawn(text_line(
        &config.primary_text,
        &config.primary_font,
        Vec2::new(0.0, 10.0),
        Vec2::ONE,
    ));
    let secondary = stage.spawn(text_line(
        &config.secondary_text,
        &config.secondary_font,
        Vec2::new(0.0, th + 10.0),
        Vec2::new(1.0, 0.6),
    ));
    stage.scene.attach_all(text_rect, [primary, secondary]);

    let slide_out = |shape: ShapeId, offset: Vec2| {
        Process::execute(move |stage: &mut Stage| stage.show(shape)).then(
            Process::translate(shape, offset)
                .with_duration(t.hex_translation_duration)
                .with_easing(t.easing),
        )
    };

    let contours = Process::generate_hex(hex_mid, Vec2::ZERO, d)
        .with_duration(t.hex_gen_duration)
        .with_easing(t.easing)
        .then(
            Process::rotate(hex_mid, -TAU)
                .with_duration(t.rotation_duration)
                .with_easing(t.easing)
                .then_all([
                    slide_out(hex_w, offset_w),
                    slide_out(hex_se, offset_se),
                    slide_out(hex_ne, offset_ne),
                ]),
        );

    let reveal = Process::wait_all().then_all([
        Process::execute(move |stage: &mut Stage| stage.show(fill_mask)).then(
            Process::generate_rect_diagonally(
                fill_mask,
                Rect::new(-d, -d * 1.5, d * 2.5, d * 3.0),
            )
            .with_duration(t.shape_fill_duration),
        ),
        Process::generate_rect(text_rect, Rect::new(0.0, 0.0, tw, th))
            .with_duration(t.shape_fill_duration),
        Process::navigation(
            vec![hex_ne, hex_w, hex_se],
            NavigationStyle::default()
                .with_color(config.primary_color.clone())
                .with_translation_factor(t.translation_factor()),
        ),
    ]);

    // Zero wait keeps the whole timeline under a single root.
    let timeline = scheduler.enqueue(Process::wait(0.0).then_all([contours, reveal]));
    let skip = scheduler.enqueue(Process::resolve_on_key_down(t.skip_keys.clone()));
    log::info!("hex intro built: {} shapes", scheduler.scene().len());

    Ok(Intro {
        hex_mid,
        satellites: [hex_ne, hex_w, hex_se],
        satellite_offsets: [offset_ne, offset_w, offset_se],
        fill_mask,
        fills,
        text_rect,
        timeline,
        skip,
    })
}

/// Background square and centered image, both clipped to `hex`.
fn add_fill_content(scene: &mut Scene, hex: ShapeId, content: &HexContent, d: f32) {
    let background = scene.spawn(
        Shape::rect(-d * 0.5, -d * 0.5, d, d).with_visual(Visual::fill(content.color.clone())),
    );
    let image = scene.spawn(
        Shape::rect(
            -content.width * 0.5,
            -content.height * 0.5,
            content.width,
            content.height,
        )
        .with_visual(Visual::image(content.src.clone())),
    );
    scene.attach_all(hex, [background, image]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use zap_motion::{Cursor, HostCommand, InputEvent, RecordingSurface, SurfaceOp};

    use crate::config::tests::sample_json;

    fn setup() -> (Scheduler, Intro) {
        let config = IntroConfig::from_json(&sample_json()).unwrap();
        let mut scheduler = Scheduler::new(config.scheduler_config());
        let intro = build(&config, &mut scheduler).unwrap();
        (scheduler, intro)
    }

    fn approx(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn starts_with_middle_contour_and_text_block() {
        let (scheduler, intro) = setup();
        assert_eq!(scheduler.stage().live(), &[intro.hex_mid, intro.text_rect]);
        // Root wait and the key listener.
        assert_eq!(scheduler.len(), 2);
        assert!(scheduler.get(intro.skip).unwrap().is_endless());
        assert!(scheduler.scene().get(intro.hex_mid).unwrap().points.is_empty());
    }

    #[test]
    fn layout_matches_logo() {
        let (scheduler, intro) = setup();
        let scene = scheduler.scene();
        assert!(approx(intro.satellite_offsets[0], Vec2::new(50.0, 86.6025)));
        assert!(approx(intro.satellite_offsets[1], Vec2::new(-100.0, 0.0)));
        assert!(approx(intro.satellite_offsets[2], Vec2::new(50.0, -86.6025)));

        assert_eq!(
            scene.get(intro.satellites[0]).unwrap().url.as_deref(),
            Some("https://ne.example")
        );
        assert_eq!(scene.get(intro.satellites[2]).unwrap().url, None);

        let mask = scene.get(intro.fill_mask).unwrap();
        assert_eq!(mask.children(), &intro.fills);
        assert!(mask.visual.is_none());
        for &fill in &intro.fills {
            assert_eq!(scene.get(fill).unwrap().children().len(), 2);
        }
        assert_eq!(scene.get(intro.text_rect).unwrap().children().len(), 2);
    }

    #[test]
    fn plays_to_the_end_in_real_time() {
        let (mut scheduler, intro) = setup();
        // 1.6s of scaled animation at half speed, plus slack.
        for _ in 0..240 {
            scheduler.tick(16.0);
        }
        assert_eq!(scheduler.resolvable_count(), 0);
        // Navigation and the key listener stay.
        assert_eq!(scheduler.len(), 2);

        let scene = scheduler.scene();
        let mid = scene.get(intro.hex_mid).unwrap();
        assert_eq!(mid.points.len(), 6);
        assert_eq!(mid.rotation, -TAU);
        for (shape, offset) in intro.satellites.iter().zip(intro.satellite_offsets) {
            assert_eq!(scene.get(*shape).unwrap().translation, offset);
        }
        assert_eq!(scene.get(intro.fill_mask).unwrap().points.len(), 4);
        assert_eq!(scene.get(intro.text_rect).unwrap().points.len(), 4);

        let live = scheduler.stage().live();
        assert_eq!(live.len(), 6);
        assert_eq!(live[0], intro.hex_mid);
        assert_eq!(live[5], intro.fill_mask);
    }

    #[test]
    fn nothing_is_revealed_before_contours_settle() {
        let (mut scheduler, intro) = setup();
        // Halfway through the hex generation.
        for _ in 0..38 {
            scheduler.tick(16.0);
        }
        assert!(!scheduler.stage().is_live(intro.fill_mask));
        assert!(!scheduler.stage().is_live(intro.satellites[0]));
        assert!(scheduler.scene().get(intro.text_rect).unwrap().points.is_empty());
    }

    #[test]
    fn skip_key_jumps_to_end_state() {
        let (mut scheduler, intro) = setup();
        scheduler.tick(16.0);
        scheduler.push_input(InputEvent::key_down("Spacebar"));
        scheduler.tick(16.0);

        assert_eq!(scheduler.resolvable_count(), 0);
        assert!(scheduler.contains(intro.skip));
        assert!(scheduler.stage().is_live(intro.fill_mask));
        assert_eq!(
            scheduler.scene().get(intro.hex_mid).unwrap().rotation,
            -TAU
        );
    }

    #[test]
    fn satellites_link_after_intro() {
        let (mut scheduler, intro) = setup();
        scheduler.push_input(InputEvent::key_down("Escape"));
        scheduler.tick(16.0);
        scheduler
            .stage_mut()
            .set_viewport(Vec2::ZERO, Vec2::new(1000.0, 600.0));

        // World origin sits at page (360, 300).
        let ne = intro.satellite_offsets[0];
        let (x, y) = (360.0 + ne.x, 300.0 + ne.y);
        scheduler.push_input(InputEvent::PointerMove { x, y });
        scheduler.push_input(InputEvent::Click { x, y });
        scheduler.tick(16.0);

        assert_eq!(
            scheduler.drain_commands(),
            vec![
                HostCommand::SetCursor(Cursor::Pointer),
                HostCommand::OpenUrl("https://ne.example".into()),
                HostCommand::SetCursor(Cursor::Auto),
            ]
        );
    }

    #[test]
    fn end_state_renders_fills_images_and_text() {
        let (mut scheduler, _intro) = setup();
        scheduler.push_input(InputEvent::key_down(" "));
        scheduler.tick(16.0);

        let mut surface = RecordingSurface::new();
        scheduler.stage_mut().render(&mut surface);

        let images: Vec<&str> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Image { asset, .. } => Some(asset.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(images, ["img/mid.png", "img/ne.png", "img/w.png", "img/se.png"]);
        assert!(surface.ops.contains(&SurfaceOp::Fill { color: "#333".into() }));

        let texts: Vec<&str> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                SurfaceOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(texts, ["Hello", "world"]);
    }
}
