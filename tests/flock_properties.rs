use ascii_flock::{vec2, FieldLayout, Flock, FlockConfig, Preset, Vec2};

const EPS: f32 = 1e-4;

fn layout() -> FieldLayout {
    FieldLayout::square_cells(300.0, 120.0, 30)
}

fn seeded(config: FlockConfig, seed: u64) -> FlockConfig {
    FlockConfig {
        seed: Some(seed),
        ..config
    }
}

// Sweep the pointer back and forth so flee, crumbs and activity all get exercised
fn wiggle(flock: &mut Flock, step: u32) {
    let t = step as f32 * 0.05;
    let x = 150.0 + 140.0 * t.sin();
    let y = 60.0 + 50.0 * (t * 1.3).cos();
    if step % 200 < 150 {
        flock.pointer_moved(vec2(x, y));
    } else {
        flock.pointer_left();
    }
}

#[test]
fn speed_never_exceeds_the_cap_for_its_mode() {
    for preset in Preset::ALL {
        let mut flock = Flock::new(seeded(preset.config(), 3), layout()).unwrap();
        let config = flock.config().clone();
        for step in 0..600 {
            wiggle(&mut flock, step);
            flock.step();
            for agent in flock.agents() {
                let cap = if agent.fleeing || agent.attracted {
                    config.boost_speed
                } else {
                    config.cruise_speed
                };
                assert!(
                    agent.speed() <= cap + EPS,
                    "{preset}: agent {} at speed {} over cap {}",
                    agent.id,
                    agent.speed(),
                    cap
                );
            }
        }
    }
}

#[test]
fn positions_stay_on_the_torus() {
    for preset in Preset::ALL {
        let mut flock = Flock::new(seeded(preset.config(), 5), layout()).unwrap();
        let bounds = *flock.layout();
        for step in 0..600 {
            wiggle(&mut flock, step);
            flock.step();
            for agent in flock.agents() {
                let p = agent.position;
                assert!(
                    p.x >= 0.0 && p.x < bounds.width && p.y >= 0.0 && p.y < bounds.height,
                    "{preset}: agent {} escaped to {p:?}",
                    agent.id
                );
            }
        }
    }
}

#[test]
fn density_stays_within_unit_range() {
    for preset in Preset::ALL {
        let mut flock = Flock::new(seeded(preset.config(), 8), layout()).unwrap();
        for step in 0..400 {
            wiggle(&mut flock, step);
            flock.step();
            let state = flock.render_state();
            assert!(state
                .density
                .values()
                .iter()
                .all(|v| (0.0..=1.0).contains(v)));
        }
    }
}

#[test]
fn empty_flock_only_decays() {
    let config = seeded(
        FlockConfig {
            agent_count: 0,
            ..FlockConfig::default()
        },
        1,
    );
    let mut flock = Flock::new(config, layout()).unwrap();
    let id = flock.add_agent(vec2(40.0, 40.0), Vec2::ZERO).unwrap();
    for _ in 0..5 {
        flock.step();
    }
    assert!(flock.density().total() > 0.0);
    flock.remove_agent(id).unwrap();
    assert!(flock.agents().is_empty());

    let mut previous = flock.density().values().to_vec();
    for _ in 0..300 {
        flock.step();
        let current = flock.density().values();
        assert!(current.iter().zip(&previous).all(|(now, before)| now <= before));
        previous = current.to_vec();
    }
    assert!(flock.density().max() < 1e-6);
}

#[test]
fn zero_sized_field_never_panics() {
    for layout in [
        FieldLayout::new(0.0, 0.0, 0, 0),
        FieldLayout::new(100.0, 100.0, 0, 10),
        FieldLayout::square_cells(100.0, 0.0, 10),
    ] {
        let mut flock = Flock::new(seeded(FlockConfig::foraging(), 2), layout).unwrap();
        flock.pointer_moved(vec2(10.0, 10.0));
        flock.drop_crumb(vec2(10.0, 10.0));
        for _ in 0..10 {
            flock.step();
        }
        let state = flock.render_state();
        assert_eq!(state.tick, 0);
        assert!(state.density.values().is_empty());
        assert!(state.crumbs.is_empty());
    }
}

#[test]
fn population_never_exceeds_the_cap() {
    let config = seeded(
        FlockConfig {
            agent_count: 10,
            population_cap: 30,
            initial_energy: 5.0,
            reproduction_probability: 1.0,
            ..FlockConfig::foraging()
        },
        4,
    );
    let mut flock = Flock::new(config, layout()).unwrap();
    let mut peak = 0;
    for step in 0..300 {
        wiggle(&mut flock, step);
        flock.step();
        let population = flock.agents().len();
        assert!(population <= 30, "population {population} over cap");
        peak = peak.max(population);
    }
    assert_eq!(peak, 30);
    assert!(flock.stats().births >= 20);
}

#[test]
fn starved_agents_are_removed_next_step() {
    let config = seeded(FlockConfig::foraging(), 6);
    let mut flock = Flock::new(config, layout()).unwrap();
    let doomed = flock.agents()[0].id;
    flock.agents_mut()[0].energy = 0.0;
    flock.step();
    assert!(flock.agents().iter().all(|agent| agent.id != doomed));
    assert!(flock.agents().iter().all(|agent| agent.energy > 0.0));
    assert_eq!(flock.stats().deaths, 1);
}

#[test]
fn lone_still_agent_settles_into_density_equilibrium() {
    let config = seeded(
        FlockConfig {
            agent_count: 0,
            boredom: false,
            wander_probability: 0.0,
            density_deposit: 0.04,
            ..FlockConfig::default()
        },
        9,
    );
    let mut flock = Flock::new(config, FieldLayout::new(10.0, 10.0, 10, 10)).unwrap();
    flock.add_agent(vec2(5.0, 5.0), Vec2::ZERO).unwrap();

    for _ in 0..1000 {
        flock.step();
    }

    let agent = &flock.agents()[0];
    assert_eq!(agent.position, vec2(5.0, 5.0));
    assert_eq!(agent.velocity, Vec2::ZERO);

    // deposit / (1 - decay) = 0.04 / 0.08
    let value = flock.density().get(5, 5);
    assert!(value > 0.0 && value < 1.0);
    assert!((value - 0.5).abs() < 1e-3, "density settled at {value}");
}

#[test]
fn crumb_pulls_agent_toward_it() {
    let config = seeded(
        FlockConfig {
            agent_count: 0,
            wander_probability: 0.0,
            attraction_radius: 200.0,
            ..FlockConfig::crumbs()
        },
        10,
    );
    let mut flock = Flock::new(config, FieldLayout::new(400.0, 400.0, 40, 40)).unwrap();
    flock.add_agent(vec2(100.0, 100.0), Vec2::ZERO).unwrap();
    flock.drop_crumb(vec2(150.0, 100.0));
    flock.step();

    let agent = &flock.agents()[0];
    let toward = (vec2(150.0, 100.0) - vec2(100.0, 100.0)).normalize();
    assert!(agent.velocity.dot(toward) > 0.0);
    assert!(agent.attracted);
}

#[test]
fn pointer_on_top_of_agent_stays_finite() {
    let config = seeded(
        FlockConfig {
            agent_count: 0,
            ..FlockConfig::background()
        },
        12,
    );
    let mut flock = Flock::new(config, layout()).unwrap();
    flock.add_agent(vec2(60.0, 60.0), Vec2::ZERO).unwrap();
    flock.pointer_moved(vec2(60.0, 60.0));
    flock.step();

    let agent = &flock.agents()[0];
    assert!(agent.velocity.is_finite());
    assert!(agent.position.is_finite());
    assert!(agent.fleeing);
}

#[test]
fn fleeing_agents_ignore_rest_and_boredom() {
    let config = seeded(
        FlockConfig {
            agent_count: 0,
            ..FlockConfig::background()
        },
        13,
    );
    let mut flock = Flock::new(config, layout()).unwrap();
    flock.add_agent(vec2(60.0, 60.0), Vec2::ZERO).unwrap();
    {
        let agent = &mut flock.agents_mut()[0];
        agent.resting = true;
        agent.rest_timer = 50;
        agent.boredom = 500.0;
    }
    flock.pointer_moved(vec2(70.0, 60.0));
    flock.step();

    let agent = &flock.agents()[0];
    assert!(agent.fleeing);
    assert!(!agent.resting);
    assert!(!agent.bored);
    assert_eq!(agent.rest_timer, 50);
    assert_eq!(agent.boredom, 500.0);
    assert!(agent.velocity.x < 0.0);
}
