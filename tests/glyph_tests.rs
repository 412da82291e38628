// Host-side tests for glyph rasterization and particle layouts.

use glam::Vec3;
use orbit_field::core::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn doodle_rasterizes_to_covered_pixels() {
    let raster = Glyph::doodle().rasterize(constants::GLYPH_RASTER_SIZE);
    assert!(!raster.is_empty());
    let size = raster.size as u16;
    assert!(raster.samples.iter().all(|[x, y]| *x < size && *y < size));
    // Center of the face is empty: inside the ring, between the eyes and mouth.
    assert!(!raster.samples.contains(&[110, 125]));
    // A point on the head ring is covered.
    let ring_x = (0.5 * 220.0 + 0.34 * 220.0) as u16;
    assert!(raster.samples.contains(&[ring_x, 110]));
}

#[test]
fn placements_stay_in_glyph_space() {
    let raster = Glyph::doodle().rasterize(120);
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..500 {
        let p = raster.place(&mut rng).unwrap();
        assert!(p.position.x.abs() <= constants::GLYPH_WORLD_SCALE);
        assert!(p.position.y.abs() <= constants::GLYPH_WORLD_SCALE);
        assert!(p.position.z.abs() <= constants::GLYPH_Z_JITTER * 0.5);
        assert!(p.delay >= 0.0);
        assert!(p.delay <= constants::GLYPH_DELAY_SPAN + constants::GLYPH_DELAY_JITTER);
    }
}

#[test]
fn delay_grows_away_from_origin() {
    let mut raster = GlyphRaster {
        size: 100,
        origin: glam::Vec2::new(60.0, 50.0),
        samples: vec![[60, 50]],
    };
    let mut rng = StdRng::seed_from_u64(1);
    let near = raster.place(&mut rng).unwrap().delay;
    raster.samples = vec![[0, 0]];
    let far = raster.place(&mut rng).unwrap().delay;
    assert!(near <= constants::GLYPH_DELAY_JITTER);
    assert!(far > near);
}

#[test]
fn empty_raster_falls_back_to_annulus() {
    let empty = GlyphRaster::default();
    assert!(empty.place(&mut StdRng::seed_from_u64(1)).is_none());

    let buffer = intro_buffer(200, 5, Some(&empty));
    assert_eq!(buffer.len(), 200);
    let intro = buffer.intro().unwrap();
    for layout in intro {
        let r = layout.glyph.truncate().length();
        assert!((0.35..=0.8 + 1e-5).contains(&r), "radius {}", r);
        assert!(layout.delay < 0.3);
    }
    assert_eq!(intro_buffer(10, 5, None).len(), 10);
}

#[test]
fn intro_layout_assigns_every_attribute() {
    let raster = Glyph::doodle().rasterize(64);
    let buffer = intro_buffer(constants::INTRO_COUNT, 11, Some(&raster));
    assert_eq!(buffer.len(), 9200);
    let intro = buffer.intro().unwrap();
    assert_eq!(intro.len(), buffer.len());
    for (i, layout) in intro.iter().enumerate().step_by(97) {
        let a = buffer.read(i);
        let r = a.base.length();
        assert!((0.95..=1.5 + 1e-5).contains(&r), "radius {}", r);
        assert!((layout.direction.length() - 1.0).abs() < 1e-4);
        assert!((0.0..1.0).contains(&a.seed));
        assert!(a.scale >= constants::INTRO_SCALE_MIN);
        assert_eq!(a.position, a.base);
        assert_eq!(a.offset, Vec3::ZERO);
    }
}

#[test]
fn field_layout_is_a_spherical_band() {
    let buffer = PointBuffer::initialize(constants::FIELD_COUNT, 2, field_layout);
    let lo = constants::FIELD_RADIUS_MIN - constants::FIELD_RADIUS_RIPPLE;
    let hi = constants::FIELD_RADIUS_MIN
        + constants::FIELD_RADIUS_SPAN
        + constants::FIELD_RADIUS_RIPPLE;
    assert!(buffer
        .bases()
        .iter()
        .all(|b| (lo - 1e-5..=hi + 1e-5).contains(&b.length())));
    assert!(buffer.intro().is_none());
    assert!(buffer.velocities().iter().all(|v| *v == Vec3::ZERO));
}

#[test]
fn same_seed_same_layout() {
    let a = PointBuffer::initialize(100, 77, field_layout);
    let b = PointBuffer::initialize(100, 77, field_layout);
    let c = PointBuffer::initialize(100, 78, field_layout);
    assert_eq!(a.bases(), b.bases());
    assert_ne!(a.bases(), c.bases());
}

#[test]
fn write_position_updates_one_particle() {
    let mut buffer = PointBuffer::initialize(3, 1, field_layout);
    buffer.write_position(1, Vec3::new(9.0, 0.0, 0.0));
    assert_eq!(buffer.read(1).position, Vec3::new(9.0, 0.0, 0.0));
    assert_eq!(buffer.read(0).position, buffer.read(0).base);
}

#[test]
#[should_panic]
fn read_out_of_range_panics() {
    let buffer = PointBuffer::initialize(3, 1, field_layout);
    buffer.read(3);
}

#[test]
#[should_panic(expected = "intro attributes")]
fn partial_intro_attributes_are_rejected() {
    PointBuffer::initialize(4, 1, |i, rng| {
        if i == 0 {
            intro_layout(annulus_placement(rng), rng)
        } else {
            field_layout(i, rng)
        }
    });
}
