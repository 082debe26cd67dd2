use super::*;
use crate::config::MaskingRules;
use crate::error::AudiologyError;

fn air_scenario(test: i32, non_test: i32, ia: u32) -> MaskingScenario {
    MaskingScenario {
        test_ear: Ear::Right,
        conduction: Conduction::Air,
        test_frequency: 1000,
        transducer: Transducer::SupraAural,
        interaural_attenuation: ia,
        right_ear: EarThresholds::default().with_air(1000, test),
        left_ear: EarThresholds::default().with_air(1000, non_test),
    }
}

fn bone_scenario() -> MaskingScenario {
    MaskingScenario {
        test_ear: Ear::Left,
        conduction: Conduction::Bone,
        test_frequency: 500,
        transducer: Transducer::Insert,
        interaural_attenuation: 55,
        right_ear: EarThresholds::default().with_air(500, 30).with_bone(500, 10),
        left_ear: EarThresholds::default().with_air(500, 50).with_bone(500, 15),
    }
}

fn evaluate(scenario: &MaskingScenario, stage: Stage, answer: AnswerValue) -> StepEvaluation {
    evaluate_masking_step(&MaskingRules::default(), scenario, stage, &answer).unwrap()
}

#[test]
fn test_air_masking_not_needed_when_crossover_below_non_test() {
    // 70 - 40 = 30 > 20
    let scenario = air_scenario(70, 20, 40);
    assert_eq!(masking_required(&scenario), Ok(false));
    assert!(evaluate(&scenario, Stage::NeedsMasking, AnswerValue::Bool(false)).correct);
    assert!(!evaluate(&scenario, Stage::NeedsMasking, AnswerValue::Bool(true)).correct);
}

#[test]
fn test_air_masking_needed_at_exact_boundary() {
    // 70 - 40 = 30 <= 30
    let scenario = air_scenario(70, 30, 40);
    assert_eq!(masking_required(&scenario), Ok(true));
    assert!(evaluate(&scenario, Stage::NeedsMasking, AnswerValue::Bool(true)).correct);
}

#[test]
fn test_air_masking_needed_when_crossover_above_non_test() {
    // 80 - 40 = 40 <= 45
    let scenario = air_scenario(80, 45, 40);
    assert_eq!(masking_required(&scenario), Ok(true));
    assert!(!evaluate(&scenario, Stage::NeedsMasking, AnswerValue::Bool(false)).correct);
}

#[test]
fn test_air_masking_one_db_past_boundary() {
    // 71 - 40 = 31 > 30
    let scenario = air_scenario(71, 30, 40);
    assert_eq!(masking_required(&scenario), Ok(false));
}

#[test]
fn test_bone_always_needs_masking() {
    let mut scenario = bone_scenario();
    assert!(evaluate(&scenario, Stage::NeedsMasking, AnswerValue::Bool(true)).correct);
    assert!(!evaluate(&scenario, Stage::NeedsMasking, AnswerValue::Bool(false)).correct);

    // Thresholds don't matter, not even missing ones
    scenario.right_ear = EarThresholds::default();
    scenario.left_ear = EarThresholds::default();
    assert!(evaluate(&scenario, Stage::NeedsMasking, AnswerValue::Bool(true)).correct);
}

#[test]
fn test_initial_level_tolerance_band() {
    // Non-test ear at 30 dB -> 45 dB
    let scenario = air_scenario(70, 30, 40);
    assert_eq!(correct_initial_level(&MaskingRules::default(), &scenario), Ok(45));

    for level in 40..=50 {
        let result = evaluate(&scenario, Stage::InitialLevel, AnswerValue::Level(level));
        assert!(result.correct, "{} dB should be accepted", level);
        assert_eq!(result.next_stage, Some(Stage::MaskedThreshold));
    }
    for level in [39, 51] {
        let result = evaluate(&scenario, Stage::InitialLevel, AnswerValue::Level(level));
        assert!(!result.correct, "{} dB should be rejected", level);
        assert_eq!(result.next_stage, None);
    }
}

#[test]
fn test_initial_level_uses_non_test_air_for_bone() {
    // Test ear left, so non-test is right with air 30 -> 45
    let scenario = bone_scenario();
    assert_eq!(correct_initial_level(&MaskingRules::default(), &scenario), Ok(45));
}

#[test]
fn test_initial_level_respects_configured_margin() {
    let rules = MaskingRules {
        initial_margin_db: 10,
        ..MaskingRules::default()
    };
    let scenario = air_scenario(70, 30, 40);
    assert_eq!(correct_initial_level(&rules, &scenario), Ok(40));
}

#[test]
fn test_masked_and_final_threshold_bounds() {
    let scenario = air_scenario(70, 30, 40);
    for stage in [Stage::MaskedThreshold, Stage::FinalThreshold] {
        assert!(evaluate(&scenario, stage, AnswerValue::Level(0)).correct);
        assert!(evaluate(&scenario, stage, AnswerValue::Level(75)).correct);
        assert!(evaluate(&scenario, stage, AnswerValue::Level(120)).correct);
        assert!(!evaluate(&scenario, stage, AnswerValue::Level(-5)).correct);
        assert!(!evaluate(&scenario, stage, AnswerValue::Level(121)).correct);
    }
}

#[test]
fn test_plateau_step_air() {
    let scenario = air_scenario(70, 30, 40);
    for step in PlateauStep::ALL {
        let result = evaluate(&scenario, Stage::PlateauStepSize, AnswerValue::Step(step));
        assert_eq!(result.correct, step == PlateauStep::TenDbTwice, "{}", step);
    }
}

#[test]
fn test_plateau_step_bone() {
    let scenario = bone_scenario();
    for step in PlateauStep::ALL {
        let result = evaluate(&scenario, Stage::PlateauStepSize, AnswerValue::Step(step));
        assert_eq!(result.correct, step == PlateauStep::FiveDbTwice, "{}", step);
    }
}

#[test]
fn test_incorrect_answers_have_feedback() {
    let scenario = air_scenario(70, 30, 40);
    let wrong = [
        (Stage::NeedsMasking, AnswerValue::Bool(false)),
        (Stage::InitialLevel, AnswerValue::Level(80)),
        (Stage::MaskedThreshold, AnswerValue::Level(200)),
        (Stage::PlateauStepSize, AnswerValue::Step(PlateauStep::FiveDbOnce)),
        (Stage::FinalThreshold, AnswerValue::Level(-20)),
    ];
    for (stage, answer) in wrong {
        let result = evaluate(&scenario, stage, answer);
        assert!(!result.correct);
        assert!(!result.feedback.is_empty(), "{} needs a hint", stage);
        assert!(!result.complete);
    }
}

#[test]
fn test_missing_non_test_threshold_is_incomplete_scenario() {
    let mut scenario = air_scenario(70, 30, 40);
    scenario.left_ear = EarThresholds::default();
    let rules = MaskingRules::default();

    for (stage, answer) in [
        (Stage::NeedsMasking, AnswerValue::Bool(true)),
        (Stage::InitialLevel, AnswerValue::Level(45)),
    ] {
        let result = evaluate_masking_step(&rules, &scenario, stage, &answer);
        assert_eq!(
            result,
            Err(AudiologyError::IncompleteScenario {
                ear: Ear::Left,
                conduction: Conduction::Air,
                frequency: 1000,
            })
        );
    }
}

#[test]
fn test_missing_test_threshold_is_incomplete_scenario() {
    let mut scenario = air_scenario(70, 30, 40);
    scenario.test_frequency = 2000;
    let result = masking_required(&scenario);
    assert!(matches!(
        result,
        Err(AudiologyError::IncompleteScenario { ear: Ear::Right, frequency: 2000, .. })
    ));
}

#[test]
fn test_later_stages_need_no_thresholds() {
    let mut scenario = air_scenario(70, 30, 40);
    scenario.left_ear = EarThresholds::default();
    scenario.right_ear = EarThresholds::default();
    assert!(evaluate(&scenario, Stage::MaskedThreshold, AnswerValue::Level(60)).correct);
    assert!(evaluate(&scenario, Stage::PlateauStepSize, AnswerValue::Step(PlateauStep::TenDbTwice)).correct);
}

#[test]
fn test_mismatched_answer_shape_is_rejected() {
    let scenario = air_scenario(70, 30, 40);
    let rules = MaskingRules::default();
    let result = evaluate_masking_step(&rules, &scenario, Stage::InitialLevel, &AnswerValue::Bool(true));
    match result {
        Err(AudiologyError::InvalidAnswer { stage, message }) => {
            assert_eq!(stage, Stage::InitialLevel);
            assert!(message.contains("dB HL"));
        }
        other => panic!("Expected InvalidAnswer but got: {:?}", other),
    }

    let result = evaluate_masking_step(&rules, &scenario, Stage::NeedsMasking, &AnswerValue::Level(1));
    assert!(matches!(result, Err(AudiologyError::InvalidAnswer { .. })));
}

#[test]
fn test_stage_order() {
    assert_eq!(Stage::NeedsMasking.next(), Some(Stage::InitialLevel));
    assert_eq!(Stage::PlateauStepSize.next(), Some(Stage::FinalThreshold));
    assert_eq!(Stage::FinalThreshold.next(), None);
    assert!(Stage::FinalThreshold.is_last());
    assert_eq!(Stage::ALL.iter().filter(|s| s.is_last()).count(), 1);
}

#[test]
fn test_stage_names_round_trip() {
    for stage in Stage::ALL {
        assert_eq!(stage.as_str().parse::<Stage>(), Ok(stage));
    }
    assert_eq!(
        "masking".parse::<Stage>(),
        Err(AudiologyError::UnknownStage("masking".to_string()))
    );
}

#[test]
fn test_answer_parse_per_stage() {
    assert_eq!(AnswerValue::parse(Stage::NeedsMasking, "Yes"), Ok(AnswerValue::Bool(true)));
    assert_eq!(AnswerValue::parse(Stage::NeedsMasking, "false"), Ok(AnswerValue::Bool(false)));
    assert_eq!(AnswerValue::parse(Stage::InitialLevel, " 45 "), Ok(AnswerValue::Level(45)));
    assert_eq!(AnswerValue::parse(Stage::FinalThreshold, "60 dB HL"), Ok(AnswerValue::Level(60)));
    assert_eq!(AnswerValue::parse(Stage::MaskedThreshold, "-5dB"), Ok(AnswerValue::Level(-5)));
    assert_eq!(
        AnswerValue::parse(Stage::PlateauStepSize, "10db-twice"),
        Ok(AnswerValue::Step(PlateauStep::TenDbTwice))
    );
}

#[test]
fn test_answer_parse_rejects_wrong_shape() {
    assert!(matches!(
        AnswerValue::parse(Stage::InitialLevel, "forty"),
        Err(AudiologyError::InvalidAnswer { stage: Stage::InitialLevel, .. })
    ));
    assert!(AnswerValue::parse(Stage::InitialLevel, "42.5").is_err());
    assert!(AnswerValue::parse(Stage::NeedsMasking, "maybe").is_err());
    assert!(AnswerValue::parse(Stage::PlateauStepSize, "15dB-twice").is_err());
}

#[test]
fn test_answer_value_json_shapes() {
    let answers: Vec<AnswerValue> = serde_json::from_str(r#"[true, 45, "10dB-twice"]"#).unwrap();
    assert_eq!(
        answers,
        vec![
            AnswerValue::Bool(true),
            AnswerValue::Level(45),
            AnswerValue::Step(PlateauStep::TenDbTwice),
        ]
    );
    assert!(serde_json::from_str::<AnswerValue>("42.5").is_err());
}

#[test]
fn test_scenario_document_fills_default_attenuation() {
    let rules = MaskingRules::default();
    let doc: ScenarioDocument = serde_yaml::from_str(
        r#"
test-ear: left
conduction: air
test-frequency: 2000
transducer: insert
left-ear:
  air: {2000: 80}
right-ear:
  air: {2000: 15}
"#,
    )
    .unwrap();
    let scenario = doc.into_scenario(&rules);
    assert_eq!(scenario.interaural_attenuation, 55);
    assert_eq!(scenario.threshold(Ear::Left, Conduction::Air), Ok(80));
    assert_eq!(scenario.non_test_ear(), Ear::Right);
}

#[test]
fn test_scenario_document_explicit_attenuation_wins() {
    let doc: ScenarioDocument = serde_yaml::from_str(
        "test-ear: right\nconduction: bone\ntest-frequency: 500\ninteraural-attenuation: 0\n",
    )
    .unwrap();
    let scenario = doc.into_scenario(&MaskingRules::default());
    assert_eq!(scenario.interaural_attenuation, 0);
    assert_eq!(scenario.transducer, Transducer::SupraAural);
}

#[test]
fn test_scenario_new_uses_transducer_default() {
    let rules = MaskingRules::default();
    let scenario = MaskingScenario::new(Ear::Right, Conduction::Air, 1000, Transducer::Insert, &rules);
    assert_eq!(scenario.interaural_attenuation, 55);
    let scenario = MaskingScenario::new(Ear::Right, Conduction::Air, 1000, Transducer::SupraAural, &rules);
    assert_eq!(scenario.interaural_attenuation, 40);
}

#[test]
fn test_exercise_completes_once_after_fifth_answer() {
    let scenario = air_scenario(70, 30, 40);
    let mut exercise = MaskingExercise::new(scenario, MaskingRules::default());
    let answers = [
        AnswerValue::Bool(true),
        AnswerValue::Level(45),
        AnswerValue::Level(65),
        AnswerValue::Step(PlateauStep::TenDbTwice),
        AnswerValue::Level(70),
    ];

    let mut completions = 0;
    for (i, answer) in answers.iter().enumerate() {
        assert_eq!(exercise.stage(), Stage::ALL[i]);
        let result = exercise.submit(answer).unwrap();
        assert!(result.correct, "answer {} should be correct: {}", i, result.feedback);
        if result.complete {
            completions += 1;
            assert_eq!(i, 4, "completion signalled early");
            assert_eq!(result.next_stage, None);
        } else {
            assert_eq!(result.next_stage, Stage::ALL.get(i + 1).copied());
        }
    }

    assert_eq!(completions, 1);
    assert!(exercise.is_complete());
    assert_eq!(exercise.attempts(), 5);
    assert!(matches!(
        exercise.submit(&AnswerValue::Level(70)),
        Err(AudiologyError::InvalidAnswer { .. })
    ));
}

#[test]
fn test_exercise_stays_on_wrong_answer() {
    let mut exercise = MaskingExercise::new(bone_scenario(), MaskingRules::default());
    let result = exercise.submit(&AnswerValue::Bool(false)).unwrap();
    assert!(!result.correct);
    assert_eq!(exercise.stage(), Stage::NeedsMasking);

    exercise.submit(&AnswerValue::Bool(true)).unwrap();
    assert_eq!(exercise.stage(), Stage::InitialLevel);
    assert_eq!(exercise.attempts(), 2);
}

#[test]
fn test_exercise_error_does_not_advance() {
    let mut exercise = MaskingExercise::new(air_scenario(70, 30, 40), MaskingRules::default());
    assert!(exercise.submit(&AnswerValue::Level(45)).is_err());
    assert_eq!(exercise.stage(), Stage::NeedsMasking);
    assert_eq!(exercise.attempts(), 0);
}
