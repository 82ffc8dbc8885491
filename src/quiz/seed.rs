//! The built-in quiz
//!
//! Every session starts with this three-round quiz loaded and returns to it
//! on reset. It is built fresh on each call so sessions never share rounds.

use super::{
    config::{Question, Quiz, Round},
    media::Image,
};

struct Entry {
    id: &'static str,
    content: &'static str,
    image: Option<&'static str>,
    answer: &'static str,
    points: u64,
}

const fn entry(
    id: &'static str,
    content: &'static str,
    image: Option<&'static str>,
    answer: &'static str,
    points: u64,
) -> Entry {
    Entry {
        id,
        content,
        image,
        answer,
        points,
    }
}

const VISUAL_WORD_PLAY: [Entry; 6] = [
    entry(
        "vwp1",
        "What phrase does this image represent?",
        Some("assets/puzzle-understand.jpg"),
        "Understand",
        100,
    ),
    entry(
        "vwp2",
        "What phrase does this image represent?",
        Some("assets/puzzle-stepsisters.jpg"),
        "Step Sisters",
        100,
    ),
    entry(
        "vwp3",
        "A large letter 'T' with a small 'U' inside it",
        None,
        "Turn Inside Out",
        150,
    ),
    entry(
        "vwp4",
        "The word 'MIND' written over the word 'MATTER'",
        None,
        "Mind Over Matter",
        150,
    ),
    entry(
        "vwp5",
        "The word 'READING' with letters arranged between two lines",
        None,
        "Reading Between the Lines",
        200,
    ),
    entry(
        "vwp6",
        "The number '0' followed by 'DEGREES'",
        None,
        "Zero Degrees",
        200,
    ),
];

const GUESS_THE_LOGO: [Entry; 6] = [
    entry(
        "logo1",
        "Which coffee company does this logo represent?",
        Some("assets/logo-starbucks.jpg"),
        "Starbucks",
        100,
    ),
    entry(
        "logo2",
        "Which fast food restaurant uses this logo?",
        Some("assets/logo-mcdonalds.jpg"),
        "McDonald's",
        100,
    ),
    entry("logo3", "A swoosh symbol", None, "Nike", 150),
    entry("logo4", "A partially eaten apple", None, "Apple", 150),
    entry("logo5", "Three stripes", None, "Adidas", 200),
    entry("logo6", "A colorful peacock", None, "NBC", 200),
];

const THE_MEME_SCENE: [Entry; 6] = [
    entry(
        "meme1",
        "This distracted boyfriend meme represents which movie series about wizards?",
        Some("assets/meme-distracted.jpg"),
        "Harry Potter",
        150,
    ),
    entry(
        "meme2",
        "Expanding brain meme: Small brain = New Hope, Galaxy brain = Empire Strikes Back, Universe brain = ?",
        None,
        "Return of the Jedi",
        150,
    ),
    entry(
        "meme3",
        "Drake pointing away/Drake pointing toward meme about superheroes: No = DC, Yes = ?",
        None,
        "Marvel",
        200,
    ),
    entry(
        "meme4",
        "Woman yelling at cat meme: Woman = Reality, Cat = Which space opera?",
        None,
        "Star Wars",
        200,
    ),
    entry(
        "meme5",
        "This is fine dog meme representing which show about a chemistry teacher?",
        None,
        "Breaking Bad",
        250,
    ),
    entry(
        "meme6",
        "Two buttons meme: Button 1 = Winter, Button 2 = Coming, Character can't choose from which show?",
        None,
        "Game of Thrones",
        250,
    ),
];

fn round(id: &str, name: &str, description: &str, entries: &[Entry]) -> Round {
    Round {
        id: id.to_owned(),
        name: name.to_owned(),
        description: description.to_owned(),
        questions: entries
            .iter()
            .map(|e| Question {
                id: e.id.to_owned(),
                content: e.content.to_owned(),
                image: e.image.map(Image::from_reference),
                answer: e.answer.to_owned(),
                points: e.points,
            })
            .collect(),
        current_question: 0,
    }
}

/// Builds the built-in quiz
///
/// # Panics
///
/// Panics if the built-in rounds break a structural rule, which the tests
/// below rule out.
pub fn quiz() -> Quiz {
    Quiz::new(vec![
        round(
            "round1",
            "Visual Word Play",
            "Say What You See! Guess the phrase or word from these clever visual puzzles.",
            &VISUAL_WORD_PLAY,
        ),
        round(
            "round2",
            "Guess The Logo",
            "Name that brand! We've removed the text - can you identify these famous logos?",
            &GUESS_THE_LOGO,
        ),
        round(
            "round3",
            "The Meme Scene",
            "Guess the Movie or TV Show from these hilarious meme formats!",
            &THE_MEME_SCENE,
        ),
    ])
    .expect("built-in quiz is well formed")
}
