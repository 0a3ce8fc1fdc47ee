// Friendship and birthday quotes shown on the site

use rand::Rng;

pub const FRIENDSHIP_QUOTES: &[&str] = &[
    "We didn't realize we were making memories, we just knew we were having fun.",
    "Some people arrive and make such a beautiful impact on your life, you can barely remember what life was like without them.",
    "It's not about who you've known the longest. It's about who walked into your life and said 'I'm here for you' and proved it.",
    "The most beautiful discovery true friends make is that they can grow separately without growing apart.",
    "We'll always be friends because you know too much. 😂",
    "A good friend knows all your best stories. A best friend has lived them with you.",
    "Friends are the family you choose.",
    "Growing up is hard. But it's easier when you've got the best people beside you.",
    "Class 11th wasn't just a year — it was a whole chapter of who we're becoming.",
    "Remember when we thought homework was our biggest problem? Those were the days.",
    "I don't know what the future holds, but I know who I want in it.",
    "Distance means nothing when someone means everything.",
    "One day, we'll look back at this and realize it was the best time of our lives.",
    "To the nights that turned into mornings, and the friends that turned into family.",
    "Thank you for being the kind of friend I always prayed for.",
    "Some bonds don't need daily conversations. They just survive on loyalty and love.",
    "We survived school, we can survive anything.",
    "I will forever be grateful for every second I spent with you all.",
    "These memories? No one can ever take them from us.",
    "Here's to the ones who made ordinary days extraordinary.",
];

pub const BIRTHDAY_QUOTES: &[&str] = &[
    "Another year older, another year of amazing memories together! 🎂",
    "Birthdays come and go, but the memories we share last forever! 🎉",
    "Here's to another trip around the sun with an incredible person! 🌟",
    "May your birthday be as wonderful as you've made our school days! 🎈",
    "Growing up is optional, but growing together is beautiful! 🎁",
    "Wishing you all the happiness your heart can hold! 💖",
];

/// Random picks from a fixed list that never repeat the previous pick
/// back-to-back (unless the list has a single entry).
#[derive(Debug, Clone)]
pub struct QuoteDeck {
    quotes: &'static [&'static str],
    last: Option<usize>,
}

impl QuoteDeck {
    pub fn new(quotes: &'static [&'static str]) -> Self {
        Self { quotes, last: None }
    }

    pub fn friendship() -> Self {
        Self::new(FRIENDSHIP_QUOTES)
    }

    pub fn birthday() -> Self {
        Self::new(BIRTHDAY_QUOTES)
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn next_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&'static str> {
        if self.quotes.is_empty() {
            return None;
        }

        let mut idx = rng.gen_range(0..self.quotes.len());
        if self.quotes.len() > 1 {
            while Some(idx) == self.last {
                idx = rng.gen_range(0..self.quotes.len());
            }
        }

        self.last = Some(idx);
        Some(self.quotes[idx])
    }

    pub fn next_quote(&mut self) -> Option<&'static str> {
        self.next_with(&mut rand::thread_rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_deck_sizes() {
        assert_eq!(QuoteDeck::friendship().len(), 20);
        assert_eq!(QuoteDeck::birthday().len(), 6);
    }

    #[test]
    fn test_never_repeats_back_to_back() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut deck = QuoteDeck::birthday();
        let mut prev = deck.next_with(&mut rng).unwrap();
        for _ in 0..200 {
            let next = deck.next_with(&mut rng).unwrap();
            assert_ne!(next, prev);
            prev = next;
        }
    }

    #[test]
    fn test_single_entry_repeats() {
        static ONLY: &[&str] = &["Friends are the family you choose."];
        let mut deck = QuoteDeck::new(ONLY);
        assert_eq!(deck.next_quote(), Some(ONLY[0]));
        assert_eq!(deck.next_quote(), Some(ONLY[0]));
    }

    #[test]
    fn test_empty_deck() {
        let mut deck = QuoteDeck::new(&[]);
        assert!(deck.is_empty());
        assert_eq!(deck.next_quote(), None);
    }
}
