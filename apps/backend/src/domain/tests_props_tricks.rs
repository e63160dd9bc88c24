use proptest::prelude::*;
use uuid::Uuid;

use crate::domain::cards_logic::{power, with_power};
use crate::domain::tricks::resolve_round;
use crate::domain::{test_gens, test_prelude, Play};

proptest! {
    #![proptest_config(test_prelude::proptest_config())]

    /// Property: the winning play has the maximum power and no earlier play matches it.
    #[test]
    fn prop_round_winner_is_first_max(
        (muestra, cards) in test_gens::complete_round(),
    ) {
        let table: Vec<Play> = cards
            .iter()
            .enumerate()
            .map(|(seat, &c)| Play {
                player_id: Uuid::new_v4(),
                player_name: format!("p{seat}"),
                seat,
                card: with_power(c, muestra),
            })
            .collect();

        let winner = resolve_round(&table);
        prop_assert!(winner.is_some());
        let idx = winner.unwrap();
        let max = table.iter().map(|p| p.card.power).max().unwrap();
        prop_assert_eq!(table[idx].card.power, max);
        prop_assert!(table[..idx].iter().all(|p| p.card.power < max));
    }

    /// Property: power is total and piezas outrank everything else.
    #[test]
    fn prop_piezas_beat_non_piezas(
        muestra in test_gens::card(),
        a in test_gens::card(),
        b in test_gens::card(),
    ) {
        let pa = power(a, muestra);
        prop_assert_eq!(pa, power(a, muestra));
        let a_pieza = crate::domain::is_pieza(a, muestra);
        let b_pieza = crate::domain::is_pieza(b, muestra);
        if a_pieza && !b_pieza {
            prop_assert!(pa > power(b, muestra));
        }
        prop_assert!(pa >= 1 && pa <= 100);
    }
}
