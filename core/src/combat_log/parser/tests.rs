use super::*;
use crate::context::resolve;

fn parse(line: &str) -> ReplayEvent {
    EventParser::new()
        .parse_line(1, line)
        .expect("line parses")
        .expect("line is not blank")
}

// interval
#[test]
fn test_parse_interval() {
    let event = parse(
        r#"{"time":12,"ticks":12,"type":"interval","unit":"CDOTA_Unit_Hero_Axe","slot":3,"hp":640,"x":120.5}"#,
    );

    assert_eq!(event.time, 12);
    assert_eq!(event.ticks, Some(12));
    let EventKind::Interval(snapshot) = event.kind else {
        panic!("expected interval, got {:?}", event.kind);
    };
    assert_eq!(resolve(snapshot.unit.unwrap()), "CDOTA_Unit_Hero_Axe");
    assert_eq!(snapshot.slot, Some(3));
    assert_eq!(snapshot.hp, Some(640));
}

#[test]
fn test_parse_interval_without_unit() {
    let event = parse(r#"{"time":0,"type":"interval","unit":"","slot":0}"#);
    let EventKind::Interval(snapshot) = event.kind else {
        panic!("expected interval");
    };
    assert!(snapshot.unit.is_none());
    assert!(snapshot.hp.is_none());
    assert_eq!(event.ticks, None);
}

// combat log
#[test]
fn test_parse_damage() {
    let event = parse(
        r#"{"time":431,"ticks":431,"type":"DOTA_COMBATLOG_DAMAGE","attackername":"npc_dota_hero_axe","sourcename":"npc_dota_hero_axe","targetname":"npc_dota_hero_lina","targetsourcename":"npc_dota_hero_lina","attackerhero":true,"targethero":true,"attackerillusion":false,"targetillusion":false,"value":87}"#,
    );

    let EventKind::Damage(record) = event.kind else {
        panic!("expected damage");
    };
    assert_eq!(resolve(record.attacker_name), "npc_dota_hero_axe");
    assert_eq!(resolve(record.source_name), "npc_dota_hero_axe");
    assert_eq!(resolve(record.target_source_name), "npc_dota_hero_lina");
    assert!(record.attacker_hero);
    assert!(record.target_hero);
    assert!(!record.target_illusion);
    assert_eq!(record.value, 87);
}

#[test]
fn test_parse_death_short_tag() {
    let event = parse(
        r#"{"time":500,"type":"combat_death","targetsourcename":"npc_dota_hero_lina","targethero":true}"#,
    );
    let EventKind::Death(record) = event.kind else {
        panic!("expected death");
    };
    assert_eq!(resolve(record.target_source_name), "npc_dota_hero_lina");
    assert!(record.target_hero);
    assert!(!record.attacker_hero);
    assert_eq!(resolve(record.attacker_name), "");
}

#[test]
fn test_parse_epilogue_keeps_key() {
    let event = parse(r#"{"time":2400,"type":"epilogue","key":"{\"gameInfo_\":{}}"}"#);
    let EventKind::Epilogue(epilogue) = event.kind else {
        panic!("expected epilogue");
    };
    assert_eq!(epilogue.key.as_deref(), Some(r#"{"gameInfo_":{}}"#));
}

#[test]
fn test_parse_other_type_is_kept() {
    let event = parse(r#"{"time":5,"type":"DOTA_COMBATLOG_PURCHASE","valuename":"item_tango"}"#);
    let EventKind::Other(tag) = event.kind else {
        panic!("expected other");
    };
    assert_eq!(resolve(tag), "DOTA_COMBATLOG_PURCHASE");
}

// failures
#[test]
fn test_missing_time_is_an_error() {
    let err = EventParser::new()
        .parse_line(7, r#"{"type":"interval","unit":"CDOTA_Unit_Hero_Axe"}"#)
        .unwrap_err();
    assert!(matches!(err, ParseError::MissingTime { line_number: 7 }));
}

#[test]
fn test_missing_type_is_an_error() {
    let err = EventParser::new().parse_line(2, r#"{"time":1}"#).unwrap_err();
    assert!(matches!(err, ParseError::MissingType { line_number: 2 }));
}

#[test]
fn test_invalid_json_is_an_error() {
    let err = EventParser::new().parse_line(9, "{\"time\": 1,").unwrap_err();
    assert!(matches!(err, ParseError::InvalidJson { line_number: 9, .. }));
    assert_eq!(err.line_number(), 9);
}

#[test]
fn test_invalid_utf8_is_an_error() {
    let err = EventParser::new()
        .parse_bytes(4, &[b'{', 0xff, b'}'])
        .unwrap_err();
    assert!(matches!(err, ParseError::InvalidEncoding { line_number: 4 }));
}

#[test]
fn test_blank_line_is_skipped() {
    assert!(EventParser::new().parse_line(1, "   \r").unwrap().is_none());
}

// whole logs
#[test]
fn test_parse_str_keeps_order_and_line_numbers() {
    let contents = concat!(
        r#"{"time":1,"type":"interval","unit":"CDOTA_Unit_Hero_Axe","slot":0,"hp":600}"#,
        "\n\n",
        r#"{"time":2,"type":"interval","unit":"CDOTA_Unit_Hero_Axe","slot":0,"hp":590}"#,
        "\r\n",
    );
    let events = EventParser::new().parse_str(contents).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].time, 1);
    assert_eq!(events[1].time, 2);
    assert_eq!(events[1].line_number, 3);
}

#[test]
fn test_parse_str_fails_on_first_bad_line() {
    let contents = "{\"time\":1,\"type\":\"interval\"}\n{\"type\":\"interval\"}\n";
    let err = EventParser::new().parse_str(contents).unwrap_err();
    assert_eq!(err.line_number(), 2);
}
