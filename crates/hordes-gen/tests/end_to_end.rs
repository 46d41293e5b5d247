use hordes_gen::{Compilation, CompileError, GenError, compile, count_entities};

fn fixture(name: &str) -> String {
    let path = format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"));
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{path}: {e}"))
}

fn compiled(name: &str) -> Compilation {
    compile(&fixture(name)).unwrap_or_else(|e| panic!("{name}: {e}"))
}

/// `(classname, value of key)` for every entity that carries `key`.
fn values<'a>(text: &'a str, key: &str) -> Vec<(&'a str, &'a str)> {
    let mut found = Vec::new();
    let mut classname = "";
    for line in text.lines() {
        let Some((k, v)) = line
            .strip_prefix('"')
            .and_then(|rest| rest.split_once("\" \""))
            .and_then(|(k, v)| Some((k, v.strip_suffix('"')?)))
        else {
            continue;
        };
        if k == "classname" {
            classname = v;
        }
        if k == key {
            found.push((classname, v));
        }
    }
    found
}

fn classnames(text: &str) -> Vec<&str> {
    values(text, "classname").into_iter().map(|(c, _)| c).collect()
}

fn count(text: &str, classname: &str) -> usize {
    classnames(text).iter().filter(|c| **c == classname).count()
}

#[test]
fn single_wave_in_a_cage() {
    let compilation = compiled("cage.hdl");
    let maps: Vec<_> = compilation.generated().collect();
    assert_eq!(maps.len(), 1);
    let (name, text) = maps[0];
    assert_eq!(name, "pit");

    assert!(text.starts_with("// Map pit\n"));
    assert_eq!(classnames(text)[0], "worldspawn");
    assert!(values(text, "message").contains(&("worldspawn", "Survive")));
    assert_eq!(count(text, "info_player_start"), 1);
    assert_eq!(count(text, "info_player_coop"), 0);
    assert_eq!(values(text, "origin")[0], ("info_player_start", "64 64 24"));

    // One player trigger, plus one kill relay per monster.
    let triggers: Vec<_> = values(text, "target")
        .into_iter()
        .filter(|(c, _)| *c == "trigger_once")
        .collect();
    assert_eq!(triggers.len(), 3);
    assert_eq!(triggers[0].1, "wave_teleport");
    assert!(triggers[1..].iter().all(|(_, t)| *t == "pit_exit"));

    assert_eq!(count(text, "monster_ogre"), 1);
    assert_eq!(count(text, "monster_knight"), 1);
    assert_eq!(count(text, "trigger_teleport"), 2);
    assert_eq!(count(text, "info_teleport_destination"), 2);
    assert_eq!(values(text, "map"), [("trigger_changelevel", "pit")]);
    assert!(values(text, "count").contains(&("trigger_counter", "2")));

    // worldspawn, start, exit (3), trigger, 2 flames, 2 monsters of 4
    assert_eq!(count_entities(text), 1 + 1 + 3 + 1 + 2 + 8);
}

#[test]
fn chained_hordes_count_surviving_monsters() {
    let compilation = compiled("chain.hdl");
    assert_eq!(compilation.failures().count(), 0);
    let maps: Vec<_> = compilation.generated().collect();
    assert_eq!(maps.iter().map(|(n, _)| *n).collect::<Vec<_>>(), ["keep", "yard"]);

    let keep = maps[0].1;
    assert_eq!(count(keep, "monster_ogre"), 4);
    assert_eq!(count(keep, "monster_shambler"), 1);
    let counters: Vec<_> = values(keep, "targetname")
        .into_iter()
        .filter(|(c, _)| *c == "trigger_counter")
        .map(|(_, n)| n)
        .collect();
    assert_eq!(counters, ["keep_exit", "b_fire"]);
    let counts: Vec<_> = values(keep, "count").into_iter().map(|(_, n)| n).collect();
    assert_eq!(counts, ["1", "4"]);
    assert_eq!(
        values(keep, "target")
            .iter()
            .filter(|(c, t)| *c == "trigger_once" && *t == "b_fire")
            .count(),
        4
    );
    assert_eq!(values(keep, "map"), [("trigger_changelevel", "yard")]);
    // Only the first horde is set off by the player.
    assert_eq!(count(keep, "light_flame_small_yellow"), 2);

    let yard = maps[1].1;
    assert_eq!(values(yard, "map"), [("trigger_changelevel", "yard")]);
    assert!(values(yard, "targetname").contains(&("trigger_teleport", "horde1_teleport")));
    assert!(classnames(yard).contains(&"item_spikes"));
    // No player declared: the start sits at the arena center.
    assert!(values(yard, "origin").contains(&("info_player_start", "256 256 24")));
}

#[test]
fn failing_maps_are_reported_individually() {
    let compilation = compiled("broken.hdl");
    assert_eq!(compilation.output, ["done"]);
    let names: Vec<_> = compilation.maps.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, ["good", "hollow", "bare", "odd"]);

    assert!(compilation.maps[0].result.is_ok());
    assert_eq!(
        compilation.maps[1].result.as_ref().unwrap_err(),
        &GenError::EmptyHorde {
            map: "hollow".into(),
            horde: "horde1".into()
        }
    );
    assert_eq!(
        compilation.maps[2].result.as_ref().unwrap_err(),
        &GenError::NoHordes { map: "bare".into() }
    );
    let odd = compilation.maps[3].result.as_ref().unwrap_err();
    assert!(matches!(odd, GenError::ArenaKind { kind, .. } if kind == "castle"));
    assert_eq!(compilation.failures().count(), 3);
}

#[test]
fn language_errors_stop_compilation() {
    let err = compile("Map m;\nm.width = \"wide\";").unwrap_err();
    let CompileError::Hdl(inner) = &err;
    assert_eq!(inner.pos().line, 2);
    assert!(err.to_string().starts_with("2:11: type error"), "{err}");
}

#[test]
fn programs_without_maps_compile_to_nothing() {
    let compilation = compile("print 1 + 2;").expect("compile");
    assert!(compilation.maps.is_empty());
    assert_eq!(compilation.output, ["3"]);
}

#[test]
fn bundled_demo_compiles() {
    let path = format!("{}/../../demos/gauntlet.hdl", env!("CARGO_MANIFEST_DIR"));
    let source = std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("{path}: {e}"));
    let compilation = compile(&source).expect("compile");
    assert_eq!(
        compilation.output,
        ["grunts Monster[6] 0.5", "knights Monster[6] 0.5", "lord Monster[7] 2.0"]
    );

    let maps: Vec<_> = compilation.generated().collect();
    assert_eq!(maps.len(), 2);
    let keep = maps[0].1;
    assert!(values(keep, "_difficulty").contains(&("worldspawn", "hard")));
    assert_eq!(count(keep, "info_player_coop"), 1);
    assert_eq!(count(keep, "monster_hell_knight"), 3);
    let counters: Vec<_> = values(keep, "count").into_iter().map(|(_, n)| n).collect();
    assert_eq!(counters, ["7", "6", "6"]);
    assert_eq!(values(keep, "map"), [("trigger_changelevel", "yard")]);
    assert_eq!(values(maps[1].1, "map"), [("trigger_changelevel", "keep")]);
}

#[test]
fn hordes_sharing_an_id_keep_separate_trigger_chains() {
    let source = "Map m; m.name = \"m\"; m.width = 10; m.height = 10; m.type = \"cage\";\n\
                  Horde a; a.id = \"w\"; a.x = 5; a.y = 5;\n\
                  Horde b; b.id = \"w\"; b.x = 5; b.y = 5;\n\
                  Monster o; o.type = \"ogre\"; a.monsters.add(o); b.monsters.add(o);\n\
                  m.hordes.add(a, b);";
    let compilation = compile(source).expect("compile");
    let (_, text) = compilation.generated().next().expect("one map");

    let names: Vec<_> = values(text, "targetname").into_iter().map(|(_, n)| n).collect();
    for name in &names {
        assert_eq!(names.iter().filter(|n| *n == name).count(), 1, "{name} repeats");
    }
    assert!(names.contains(&"w_teleport"));
    assert!(names.contains(&"w_2_teleport"));
    assert!(names.contains(&"m_w_2_m0_killed"));
}
