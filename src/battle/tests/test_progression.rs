#[cfg(test)]
mod tests {
    use crate::battle::state::{BattleEvent, BattleOutcome, EventBus, Opponent};
    use crate::battle::tests::common::{
        create_test_battle, create_test_battle_against, TestCreatureBuilder,
    };
    use pretty_assertions::assert_eq;
    use schema::{CreatureId, TrainerId};

    #[test]
    fn test_level_up_message_replaces_victory_message() {
        let (mut engine, _) = create_test_battle(
            vec![TestCreatureBuilder::new(CreatureId::CalcBoy)
                .with_level(20)
                .with_xp(60)
                .with_hp(12)
                .build()],
            TestCreatureBuilder::new(CreatureId::ByteBit).build(),
        );
        let mut bus = EventBus::new();

        engine.select_move(0, &mut bus).unwrap();

        assert_eq!(
            bus.messages(),
            vec![
                "Additurt used Quick Study!".to_string(),
                "Additurt grew to level 21!".to_string()
            ]
        );
        let report = engine.report().unwrap();
        assert_eq!(report.outcome, BattleOutcome::Win);
        let winner = &report.party[0];
        assert_eq!(winner.level, 21);
        assert_eq!(winner.xp, 10);
        assert_eq!(winner.max_hp, 45);
        assert_eq!(winner.current_hp, 45);
    }

    #[test]
    fn test_only_the_active_creature_gains_experience() {
        let (mut engine, _) = create_test_battle(
            vec![
                TestCreatureBuilder::new(CreatureId::CalcBoy).with_level(20).build(),
                TestCreatureBuilder::new(CreatureId::SciGuy).build(),
            ],
            TestCreatureBuilder::new(CreatureId::ByteBit).build(),
        );
        let mut bus = EventBus::new();

        engine.select_move(0, &mut bus).unwrap();

        let report = engine.report().unwrap();
        assert_eq!(report.party[0].xp, 50);
        assert_eq!(report.party[1].xp, 0);
        assert_eq!(bus.messages()[1], "Wild Glitch fainted! Gained 50 XP.");
    }

    #[test]
    fn test_trainer_victory_gives_no_experience() {
        let (mut engine, opening) = create_test_battle_against(
            vec![TestCreatureBuilder::new(CreatureId::CalcBoy).with_level(20).build()],
            TestCreatureBuilder::new(CreatureId::ByteBit).build(),
            Opponent::Trainer(TrainerId::StudentTim),
        );
        assert_eq!(opening.messages()[0], "Glitch is ready to battle!");
        let mut bus = EventBus::new();

        engine.select_move(0, &mut bus).unwrap();

        assert!(!bus
            .events()
            .iter()
            .any(|e| matches!(e, BattleEvent::ExperienceGained { .. })));
        assert_eq!(bus.messages()[1], "Glitch fainted!");
        assert_eq!(engine.report().unwrap().party[0].xp, 0);
    }
}
