//! Core game state machine.
//!
//! This module contains the main `GameState` struct and the Hand and Foot
//! rules: round setup, draw, meld evaluation, laying down, pile completion,
//! discard, round and game termination, and scoring.

use crate::area::{PlayingArea, Table, DISCARD, DRAW};
use crate::card::{Back, Card, Pack};
use crate::error::{GameError, Result};
use crate::events::GameEvent;
use crate::group::{CardGroup, GroupKind, Hand, Pile};
use crate::meld::{Cards, Meld, MeldType};
use crate::player::{Player, PlayerId};
use crate::rules::RuleSet;
use crate::shuffle::{MultiShuffle, Shuffler};
use crate::strategy::{DiscardRanker, DrawFrom, Strategy};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Game phase
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Players are still being seated
    Uninitialized,

    /// Packs are on the table, no round dealt yet
    GameSetup,

    /// Cards are being gathered, shuffled and dealt
    RoundSetup { round: u8 },

    /// Waiting for a player to take their turn
    PlayerTurn { player: PlayerId },

    /// A round ended; `went_out` is the player who emptied hand and foot
    RoundComplete {
        round: u8,
        went_out: Option<PlayerId>,
    },

    /// The last round ended
    GameOver { winner: PlayerId },
}

/// Cards headed for one meld on the table
#[derive(Debug, Clone)]
struct PlannedMeld {
    meld_type: MeldType,
    naturals: Vec<Card>,
    wilds: Vec<Card>,
    /// A meld of this type is already on the table
    extends: bool,
}

impl PlannedMeld {
    fn new(meld: Meld, extends: bool) -> Self {
        Self {
            meld_type: meld.meld_type,
            naturals: meld.cards,
            wilds: Vec::new(),
            extends,
        }
    }

    fn len(&self) -> usize {
        self.naturals.len() + self.wilds.len()
    }
}

#[derive(Debug, Default)]
struct MeldPlan {
    melds: Vec<PlannedMeld>,
    /// Wildcards for the down fans, placed after `melds` are laid
    spare_wilds: Vec<Card>,
    going_down: bool,
    points: i32,
}

/// Shrink a plan until at least one card stays in hand for the discard.
///
/// Natural melds give up cards while they stay large enough; anything else is
/// dropped from the end of the plan.
fn keep_one_card(plan: &mut Vec<PlannedMeld>, hand_len: usize, min_meld_size: usize) {
    while plan.iter().map(PlannedMeld::len).sum::<usize>() >= hand_len {
        let Some(last) = plan.last_mut() else { break };
        let floor = if last.extends { 1 } else { min_meld_size };
        if last.wilds.is_empty() && last.naturals.len() > floor {
            last.naturals.pop();
        } else {
            plan.pop();
        }
    }
}

fn pile_mut(area: &mut PlayingArea, index: usize) -> Result<&mut Pile> {
    area.groups
        .get_mut(index)
        .ok_or_else(|| GameError::Internal(format!("missing pile {index} in {}", area.name)))?
        .as_pile_mut()
}

fn fresh_rng() -> StdRng {
    StdRng::from_entropy()
}

/// The complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Shared areas and players
    pub table: Table,
    pub rules: RuleSet,
    pub phase: GamePhase,
    /// Current round, 0 before the first deal
    pub round: u8,
    pub current_player: PlayerId,
    /// Turns played so far across all rounds
    pub turn_number: u32,
    /// Each finished round's score per player
    pub round_scores: Vec<Vec<i32>>,
    /// Running total per player
    pub totals: Vec<i32>,
    #[serde(skip, default = "fresh_rng")]
    rng: StdRng,
}

impl GameState {
    pub fn new(rules: RuleSet) -> Self {
        Self::with_rng(rules, StdRng::from_entropy())
    }

    /// A game whose shuffles and deals are reproducible
    pub fn with_seed(rules: RuleSet, seed: u64) -> Self {
        Self::with_rng(rules, StdRng::seed_from_u64(seed))
    }

    fn with_rng(rules: RuleSet, rng: StdRng) -> Self {
        Self {
            table: Table::new(),
            rules,
            phase: GamePhase::Uninitialized,
            round: 0,
            current_player: 0,
            turn_number: 0,
            round_scores: Vec::new(),
            totals: Vec::new(),
            rng,
        }
    }

    pub fn player_count(&self) -> usize {
        self.table.players.len()
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.table.players.get(id as usize)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver { .. })
    }

    pub fn get_winner(&self) -> Option<PlayerId> {
        if let GamePhase::GameOver { winner } = self.phase {
            Some(winner)
        } else {
            None
        }
    }

    /// Cards on the table, counting every area
    pub fn card_count(&self) -> usize {
        self.table.card_count()
    }

    /// Cards brought to the table at setup
    pub fn expected_card_count(&self) -> usize {
        (self.player_count() + 1) * Pack::SIZE
    }

    /// Seat a player. Only possible before game setup.
    pub fn add_player(
        &mut self,
        name: impl Into<String>,
        precision: usize,
        speed: f64,
        strategy: Strategy,
    ) -> Result<PlayerId> {
        if self.phase != GamePhase::Uninitialized {
            return Err(GameError::InvalidPhase);
        }
        let id = PlayerId::try_from(self.player_count())
            .ok()
            .filter(|id| *id < PlayerId::MAX)
            .ok_or_else(|| GameError::InvalidArguments("too many players".to_string()))?;

        self.table
            .add_player(Player::new(id, name, precision, speed, strategy))?;
        Ok(id)
    }

    /// Lay out the shared areas and bring one pack per player plus one
    pub fn game_setup(&mut self) -> Result<Vec<GameEvent>> {
        if self.phase != GamePhase::Uninitialized {
            return Err(GameError::InvalidPhase);
        }
        if self.player_count() < 2 {
            return Err(GameError::InvalidArguments(
                "at least two players are needed".to_string(),
            ));
        }
        self.rules.validate()?;

        self.table.add_area(PlayingArea::new(DISCARD))?;
        self.table.add_area(PlayingArea::new(DRAW))?;

        let packs = self.player_count() + 1;
        let discard = self.table.area_mut(DISCARD)?;
        for i in 0..packs {
            discard.append(Pile::face_down(Pack::new(Back::nth(i)).cards));
        }

        self.totals = vec![0; self.player_count()];
        self.phase = GamePhase::GameSetup;
        info!(players = self.player_count(), packs, "game set up");

        Ok(vec![GameEvent::GameStarted {
            players: self.player_count() as u8,
            packs,
        }])
    }

    /// Gather every card, shuffle, and deal a hand and a foot to each player
    pub fn round_setup(&mut self) -> Result<Vec<GameEvent>> {
        match self.phase {
            GamePhase::GameSetup | GamePhase::RoundComplete { .. } => {}
            GamePhase::GameOver { .. } => return Err(GameError::GameOver),
            _ => return Err(GameError::InvalidPhase),
        }
        let round = self.round.saturating_add(1);
        let threshold = self.rules.round_threshold(round)?;

        self.phase = GamePhase::RoundSetup { round };
        self.round = round;

        let mut gathered = PlayingArea::new("gathered");
        for player in self.table.players.iter_mut() {
            player.is_down = false;
            player.in_foot = false;
            gathered.transfer_cards(player.areas_mut());
        }
        gathered.transfer_cards([self.table.area_mut(DRAW)?]);

        let discard = self.table.area_mut(DISCARD)?;
        discard.transfer_cards([&mut gathered]);
        let mut pool = discard.clear_groups();
        discard.append(Pile::new(Vec::new(), true));

        let shufflers: Vec<Shuffler> = self.table.players.iter().map(Player::shuffler).collect();
        pool.multi_quick_shuffle(&mut self.rng, &MultiShuffle::with_participants(shufflers))?;

        let n = self.player_count();
        let draw = self.table.area_mut(DRAW)?;
        for pile in pool.split(n, false, false)? {
            draw.append(pile);
        }
        self.deal()?;

        let first = ((round - 1) as usize % n) as PlayerId;
        self.current_player = first;
        self.phase = GamePhase::PlayerTurn { player: first };
        info!(round, threshold, first_player = first, "round started");

        Ok(vec![GameEvent::RoundStarted { round, threshold }])
    }

    /// Each player's hand and foot come from the draw piles on either side of
    /// them; which of the two becomes the foot is random.
    fn deal(&mut self) -> Result<()> {
        let n = self.player_count();
        let hand_size = self.rules.hand_size;

        for idx in 0..n {
            let draw = self.table.area_mut(DRAW)?;
            let left = pile_mut(draw, (idx + n - 1) % n)?.draw(hand_size)?;
            let right = pile_mut(draw, (idx + 1) % n)?.draw(hand_size)?;
            let (foot_cards, hand_cards) = if self.rng.gen_bool(0.5) {
                (left, right)
            } else {
                (right, left)
            };

            let mut foot = Pile::face_down(foot_cards);
            foot.sort(&self.rules.classifier);
            let mut hand = Hand::new(hand_cards);
            hand.sort(&self.rules.classifier);

            let player = &mut self.table.players[idx];
            player.foot.append(foot);
            player.hand.append(hand);
        }
        Ok(())
    }

    /// Set up the game and deal the first round
    pub fn start(&mut self) -> Result<Vec<GameEvent>> {
        let mut events = self.game_setup()?;
        events.extend(self.round_setup()?);
        Ok(events)
    }

    /// Draw the turn's cards, starting at the player's own pile (or a random
    /// one) and moving on through the draw piles in order.
    ///
    /// Fails without moving anything when the draw piles together hold too
    /// few cards.
    pub fn draw(&mut self, player: PlayerId) -> Result<Vec<GameEvent>> {
        let need = self.rules.draw_count;
        let draw_from = self.table.player(player)?.strategy.draw_from;

        let area = self.table.area_mut(DRAW)?;
        let piles = area.groups.len();
        if area.card_count() < need {
            return Err(GameError::NoCardsAvailable { player });
        }
        let start = match draw_from {
            DrawFrom::Closest => player as usize,
            DrawFrom::Random => self.rng.gen_range(0..piles),
        };

        let mut cards = Vec::with_capacity(need);
        for step in 0..piles {
            let pile = pile_mut(area, (start + step) % piles)?;
            let take = (need - cards.len()).min(pile.count());
            cards.extend(pile.draw(take)?);
            if cards.len() == need {
                break;
            }
        }

        let count = cards.len();
        let hand = self.table.player_mut(player)?.hand_mut()?;
        hand.add_cards(cards);
        hand.sort(&self.rules.classifier);
        debug!(player, count, "drew cards");

        Ok(vec![GameEvent::CardsDrawn { player, count }])
    }

    /// Natural melds in the player's hand that are big enough to lay down
    pub fn ready_melds(&self, player: PlayerId) -> Result<Vec<Meld>> {
        let hand = self.table.player(player)?.hand()?;
        Ok(hand
            .get_melds(&self.rules.classifier, true)
            .into_iter()
            .filter(|m| m.len() >= self.rules.min_meld_size)
            .collect())
    }

    /// Whether the ready melds are worth more than this round's threshold
    pub fn can_lay_down(&self, player: PlayerId) -> Result<bool> {
        let threshold = self.rules.round_threshold(self.round)?;
        let points: i32 = self
            .ready_melds(player)?
            .iter()
            .map(|m| self.rules.points_of(m))
            .sum();
        Ok(points > threshold)
    }

    /// Move cards from the player's hand onto their melds.
    ///
    /// Natural cards must share one meld type; with `onto` set they must match
    /// it. A meld of that type in the complete area takes the cards, otherwise
    /// they go to a fan in the down area. Wildcards on their own can only join
    /// a meld already on the table, and never a completed pile. This does not
    /// check turn order or whether the player has gone down.
    pub fn lay_down(&mut self, player: PlayerId, cards: Vec<Card>, onto: Option<&MeldType>) -> Result<Vec<GameEvent>> {
        let classifier = &self.rules.classifier;
        let (naturals, wilds): (Vec<Card>, Vec<Card>) =
            cards.into_iter().partition(|c| !classifier.is_wild(c));
        if naturals.is_empty() && wilds.is_empty() {
            return Err(GameError::InvalidMeld("nothing to lay down".to_string()));
        }

        let meld_type = match (onto, naturals.first()) {
            (Some(meld_type), _) => meld_type.clone(),
            (None, Some(card)) => classifier.meld_type(card),
            (None, None) => {
                return Err(GameError::InvalidMeld(
                    "a meld needs at least one natural card".to_string(),
                ))
            }
        };
        if meld_type.is_wild() {
            return Err(GameError::InvalidMeld(
                "a meld needs at least one natural card".to_string(),
            ));
        }
        if naturals.iter().any(|c| classifier.meld_type(c) != meld_type) {
            return Err(GameError::InvalidMeld(format!(
                "cards do not all match {meld_type}"
            )));
        }

        let p = self.table.player_mut(player)?;
        let in_complete = p.complete.get_group_by_meld_type(&meld_type, classifier).is_some();
        let in_down = p.down.get_group_by_meld_type(&meld_type, classifier).is_some();
        if naturals.is_empty() && !in_complete && !in_down {
            return Err(GameError::InvalidMeld(format!(
                "no {meld_type} meld for wildcards to join"
            )));
        }
        if in_complete && !wilds.is_empty() {
            return Err(GameError::InvalidMeld(format!(
                "wildcards cannot join the completed {meld_type} pile"
            )));
        }

        let mut remaining = p.hand()?.cards().to_vec();
        for card in naturals.iter().chain(&wilds) {
            let pos = remaining.iter().position(|c| c == card).ok_or_else(|| {
                GameError::InvalidMeld(format!("{} is not in player {player}'s hand", card.shorthand()))
            })?;
            remaining.remove(pos);
        }

        let count = naturals.len() + wilds.len();
        let wild_count = wilds.len();
        let mut laid = naturals;
        laid.extend(wilds);

        let (area, kind) = if in_complete {
            (&mut p.complete, GroupKind::Pile)
        } else {
            (&mut p.down, GroupKind::Fan)
        };
        area.add_to_group_by_meld_type(laid, kind, classifier, Some(&meld_type))?;

        let hand = p.hand_mut()?;
        hand.remove_all_cards();
        hand.add_cards(remaining);
        debug!(player, %meld_type, count, wilds = wild_count, "laid down");

        let mut events = vec![GameEvent::MeldLaidDown {
            player,
            meld_type,
            count,
            wilds: wild_count,
        }];
        events.extend(self.complete_piles(player)?);
        Ok(events)
    }

    /// Promote every down fan that reached the complete size to a face-up pile
    fn complete_piles(&mut self, player: PlayerId) -> Result<Vec<GameEvent>> {
        let classifier = &self.rules.classifier;
        let size = self.rules.complete_size;
        let p = self.table.player_mut(player)?;

        let mut events = Vec::new();
        let mut i = 0;
        while i < p.down.groups.len() {
            if p.down.groups[i].count() < size {
                i += 1;
                continue;
            }
            let mut fan = p.down.groups.remove(i);
            let meld_type = fan
                .meld_type(classifier)
                .ok_or_else(|| GameError::Internal("completed an empty meld".to_string()))?;
            let pure = fan.count_wilds(classifier) == 0;
            p.complete.append(Pile::new(fan.remove_all_cards(), true));

            info!(player, %meld_type, pure, "pile completed");
            events.push(GameEvent::PileCompleted {
                player,
                meld_type,
                pure,
            });
        }
        Ok(events)
    }

    fn plan_melds(&self, player: &Player) -> Result<MeldPlan> {
        let rules = &self.rules;
        let classifier = &rules.classifier;
        let hand = player.hand()?;
        let hand_len = hand.count();
        let naturals = hand.get_melds(classifier, true);

        if !player.is_down {
            let threshold = rules.round_threshold(self.round)?;
            let mut melds: Vec<PlannedMeld> = naturals
                .into_iter()
                .filter(|m| m.len() >= rules.min_meld_size)
                .map(|m| PlannedMeld::new(m, false))
                .collect();
            keep_one_card(&mut melds, hand_len, rules.min_meld_size);

            let points: i32 = melds.iter().map(|m| rules.points_of(&m.naturals)).sum();
            if melds.is_empty() || points <= threshold {
                return Ok(MeldPlan::default());
            }
            return Ok(MeldPlan {
                melds,
                spare_wilds: Vec::new(),
                going_down: true,
                points,
            });
        }

        let on_table = |meld_type: &MeldType| {
            player.down.includes_meld_type(meld_type, classifier)
                || player.complete.includes_meld_type(meld_type, classifier)
        };

        let mut wilds = hand.get_wilds(classifier);
        let mut melds = Vec::new();
        let mut leftovers = Vec::new();
        for meld in naturals {
            let extends = on_table(&meld.meld_type);
            if extends || meld.len() >= rules.min_meld_size {
                melds.push(PlannedMeld::new(meld, extends));
            } else {
                leftovers.push(meld);
            }
        }

        let mut spare_wilds = Vec::new();
        let strategy = &player.strategy;
        let plays_safe = strategy.plays_safe(player.in_foot, hand_len, player.has_complete_pile());
        if strategy.allows_dirty(plays_safe) {
            // A wildcard turns a pair into a meld
            let mut singles_only = true;
            for meld in leftovers {
                if meld.len() + 1 < rules.min_meld_size {
                    continue;
                }
                match wilds.pop() {
                    Some(wild) => {
                        let mut planned = PlannedMeld::new(meld, false);
                        planned.wilds.push(wild);
                        melds.push(planned);
                    }
                    None => singles_only = false,
                }
            }

            if singles_only {
                spare_wilds = wilds;
            }
        }

        keep_one_card(&mut melds, hand_len, rules.min_meld_size);
        Ok(MeldPlan {
            melds,
            spare_wilds,
            going_down: false,
            points: 0,
        })
    }

    /// Evaluate the hand and lay down whatever the player's strategy allows
    fn meld(&mut self, player: PlayerId) -> Result<Vec<GameEvent>> {
        let plan = self.plan_melds(self.table.player(player)?)?;

        let mut events = Vec::new();
        if plan.going_down {
            self.table.player_mut(player)?.is_down = true;
            info!(player, points = plan.points, round = self.round, "went down");
            events.push(GameEvent::WentDown {
                player,
                points: plan.points,
            });
        }
        for meld in plan.melds {
            let mut cards = meld.naturals;
            cards.extend(meld.wilds);
            events.extend(self.lay_down(player, cards, Some(&meld.meld_type))?);
        }

        // One wildcard per remaining down fan, smallest first
        if !plan.spare_wilds.is_empty() {
            let classifier = &self.rules.classifier;
            let mut fans: Vec<(usize, MeldType)> = self
                .table
                .player(player)?
                .down
                .groups
                .iter()
                .filter_map(|g| g.meld_type(classifier).map(|t| (g.count(), t)))
                .collect();
            fans.sort_by_key(|(count, _)| *count);

            for ((_, meld_type), wild) in fans.into_iter().zip(plan.spare_wilds) {
                if self.table.player(player)?.hand()?.count() <= 1 {
                    break;
                }
                events.extend(self.lay_down(player, vec![wild], Some(&meld_type))?);
            }
        }
        Ok(events)
    }

    /// Discard the ranker's first choice onto the discard pile
    pub fn discard(&mut self, player: PlayerId, ranker: &dyn DiscardRanker) -> Result<Vec<GameEvent>> {
        let p = self.table.player(player)?;
        let hand = p.hand()?;
        if hand.is_empty() {
            return Err(GameError::EmptyHand { player });
        }

        let ranked = ranker.rank_discards(hand.cards(), hand.cards(), p, &self.rules);
        let choice = ranked
            .into_iter()
            .next()
            .ok_or_else(|| GameError::Internal("no discard candidates ranked".to_string()))?;

        let card = self
            .table
            .player_mut(player)?
            .hand_mut()?
            .remove(&choice)
            .ok_or_else(|| {
                GameError::Internal(format!("discard {} is not in the hand", choice.shorthand()))
            })?;

        let discard = self.table.area_mut(DISCARD)?;
        pile_mut(discard, 0)?.push(card.clone());
        debug!(player, card = %card.shorthand(), "discarded");

        Ok(vec![GameEvent::CardDiscarded { player, card }])
    }

    fn pick_up_foot(&mut self, player: PlayerId) -> Result<GameEvent> {
        let p = self.table.player_mut(player)?;
        let cards = p.foot_mut()?.remove_all_cards();
        let hand = p.hand_mut()?;
        hand.add_cards(cards);
        hand.sort(&self.rules.classifier);
        p.in_foot = true;

        info!(player, "picked up foot");
        Ok(GameEvent::FootPickedUp { player })
    }

    fn check_turn(&self, player: PlayerId) -> Result<()> {
        self.table.player(player)?;
        match self.phase {
            GamePhase::GameOver { .. } => Err(GameError::GameOver),
            GamePhase::PlayerTurn { player: current } if current == player => Ok(()),
            GamePhase::PlayerTurn { .. } => Err(GameError::NotYourTurn),
            _ => Err(GameError::InvalidPhase),
        }
    }

    /// Play one turn, discarding according to the player's own strategy
    pub fn play_turn(&mut self, player: PlayerId) -> Result<Vec<GameEvent>> {
        let policy = self.table.player(player)?.strategy.discard;
        self.play_turn_with(player, &policy)
    }

    /// Play one turn with an external discard ranker.
    ///
    /// Draw, lay down, discard. A player whose hand empties picks up their
    /// foot and carries on within the same turn; with the foot also gone the
    /// round ends.
    pub fn play_turn_with(&mut self, player: PlayerId, ranker: &dyn DiscardRanker) -> Result<Vec<GameEvent>> {
        self.check_turn(player)?;
        let result = self.run_turn(player, ranker);
        if let Err(e) = &result {
            warn!(player, round = self.round, error = %e, "turn failed");
        }
        result
    }

    fn run_turn(&mut self, player: PlayerId, ranker: &dyn DiscardRanker) -> Result<Vec<GameEvent>> {
        let mut events = self.draw(player)?;
        loop {
            events.extend(self.meld(player)?);
            events.extend(self.discard(player, ranker)?);

            let p = self.table.player(player)?;
            if !p.hand()?.is_empty() {
                break;
            }
            if p.foot.card_count() == 0 {
                events.extend(self.end_round(Some(player))?);
                return Ok(events);
            }
            events.push(self.pick_up_foot(player)?);
        }

        let next = (player + 1) % self.player_count() as PlayerId;
        self.current_player = next;
        self.turn_number += 1;
        self.phase = GamePhase::PlayerTurn { player: next };

        events.push(GameEvent::TurnEnded {
            player,
            next_player: next,
        });
        Ok(events)
    }

    /// End the current round early, e.g. when the draw piles run dry
    pub fn close_round(&mut self) -> Result<Vec<GameEvent>> {
        match self.phase {
            GamePhase::PlayerTurn { .. } => self.end_round(None),
            GamePhase::GameOver { .. } => Err(GameError::GameOver),
            _ => Err(GameError::InvalidPhase),
        }
    }

    fn end_round(&mut self, went_out: Option<PlayerId>) -> Result<Vec<GameEvent>> {
        let scores = (0..self.player_count())
            .map(|id| self.get_player_score(id as PlayerId))
            .collect::<Result<Vec<i32>>>()?;

        for (total, score) in self.totals.iter_mut().zip(&scores) {
            *total += score;
        }
        self.round_scores.push(scores.clone());
        self.phase = GamePhase::RoundComplete {
            round: self.round,
            went_out,
        };
        info!(round = self.round, ?went_out, ?scores, "round complete");

        Ok(vec![GameEvent::RoundEnded {
            round: self.round,
            went_out,
            scores,
        }])
    }

    /// Deal the next round, or finish the game after the last one
    pub fn next_round(&mut self) -> Result<Vec<GameEvent>> {
        match self.phase {
            GamePhase::RoundComplete { .. } => {}
            GamePhase::GameOver { .. } => return Err(GameError::GameOver),
            _ => return Err(GameError::InvalidPhase),
        }
        if self.round < self.rules.max_rounds() {
            return self.round_setup();
        }

        let winner = self.leader();
        self.phase = GamePhase::GameOver { winner };
        info!(winner, totals = ?self.totals, "game over");

        Ok(vec![GameEvent::GameWon {
            player: winner,
            totals: self.totals.clone(),
        }])
    }

    /// Highest running total, earliest seat on ties
    fn leader(&self) -> PlayerId {
        let mut best = 0;
        for (i, total) in self.totals.iter().enumerate() {
            if *total > self.totals[best] {
                best = i;
            }
        }
        best as PlayerId
    }

    /// Complete piles with their bonus, plus cards down, minus cards left in
    /// hand and foot
    pub fn get_player_score(&self, player: PlayerId) -> Result<i32> {
        let rules = &self.rules;
        let p = self.table.player(player)?;

        let mut score = 0;
        for pile in &p.complete.groups {
            score += rules.points_of(pile);
            score += if pile.count_wilds(&rules.classifier) == 0 {
                rules.pure_bonus
            } else {
                rules.dirty_bonus
            };
        }
        for fan in &p.down.groups {
            score += rules.points_of(fan);
        }
        for group in p.hand.groups.iter().chain(&p.foot.groups) {
            score -= rules.points_of(group);
        }
        Ok(score)
    }

    /// Snapshot of the whole state as JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| GameError::Internal(e.to_string()))
    }
}
