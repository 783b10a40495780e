use expedition_core::protocol::{decode, encode, Decision, DecisionError, Heading, ResourceKind};

#[test]
fn decodes_every_recognized_action() {
    assert_eq!(decode(r#"{ "action": "stop" }"#).unwrap(), Decision::Stop);
    assert_eq!(decode(r#"{"action": "explore"}"#).unwrap(), Decision::Explore);
    assert_eq!(
        decode(r#"{"action": "move", "parameters": {"direction": "NORTH"}}"#).unwrap(),
        Decision::Move {
            direction: Heading::North
        }
    );
    assert_eq!(
        decode(r#"{"action": "scout", "parameters": {"direction": "WEST"}}"#).unwrap(),
        Decision::Scout {
            direction: Heading::West
        }
    );
    assert_eq!(
        decode(r#"{"action": "collect", "parameters": {"resource": "WOOD"}}"#).unwrap(),
        Decision::Collect {
            resource: ResourceKind::parse("WOOD").unwrap()
        }
    );
}

#[test]
fn resource_names_are_case_normalized() {
    let decision = decode(r#"{"action": "collect", "parameters": {"resource": "wood"}}"#).unwrap();
    assert_eq!(
        decision,
        Decision::Collect {
            resource: ResourceKind::parse("WOOD").unwrap()
        }
    );
}

#[test]
fn rejects_text_that_is_not_a_json_object() {
    assert!(matches!(
        decode("bravely deciding to stop"),
        Err(DecisionError::NotAnObject(_))
    ));
    assert!(matches!(
        decode(r#"["stop"]"#),
        Err(DecisionError::NotAnObject(_))
    ));
}

#[test]
fn rejects_missing_or_unknown_actions() {
    assert!(matches!(
        decode(r#"{"parameters": {}}"#),
        Err(DecisionError::MissingAction)
    ));
    assert!(matches!(
        decode(r#"{"action": "teleport"}"#),
        Err(DecisionError::UnknownAction(_))
    ));
}

#[test]
fn rejects_bad_parameters() {
    assert!(matches!(
        decode(r#"{"action": "move"}"#),
        Err(DecisionError::MissingParameter { .. })
    ));
    assert!(matches!(
        decode(r#"{"action": "move", "parameters": {"direction": "UP"}}"#),
        Err(DecisionError::UnknownDirection(_))
    ));
    assert!(matches!(
        decode(r#"{"action": "collect", "parameters": {"resource": "w00d"}}"#),
        Err(DecisionError::BadResourceName(_))
    ));
}

#[test]
fn encoding_round_trips_through_decode() {
    let decisions = [
        Decision::Stop,
        Decision::Explore,
        Decision::Move {
            direction: Heading::South,
        },
        Decision::Collect {
            resource: ResourceKind::parse("QUARTZ").unwrap(),
        },
    ];
    for decision in decisions {
        assert_eq!(decode(&encode(&decision)).unwrap(), decision);
    }
}
