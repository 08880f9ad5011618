//! Literary corpus for procedural tasks.
//!
//! Sentences come from public-domain works (all published before 1928,
//! sourced from Project Gutenberg) and are pre-segmented into short fragments
//! of plain letters and spaces so word motions behave predictably.

/// A public-domain work with its pre-segmented sentences.
pub struct TextSource {
    pub name: &'static str,
    pub author: &'static str,
    pub year: u16,
    pub license: &'static str,
    pub attribution: &'static str,
    pub sentences: &'static [&'static str],
}

pub const SOURCES: &[TextSource] = &[
    TextSource {
        name: "Pride and Prejudice",
        author: "Jane Austen",
        year: 1813,
        license: "Public Domain",
        attribution: "Text from 'Pride and Prejudice' by Jane Austen (1813), sourced from Project Gutenberg",
        sentences: &[
            "It is a truth universally acknowledged",
            "that a single man in possession of a good fortune",
            "must be in want of a wife",
            "Mr Bennet was so odd a mixture",
            "of quick parts and sarcastic humour",
            "reserve and caprice",
            "She was a woman of mean understanding",
            "little information and uncertain temper",
            "The business of her life was to get her daughters married",
            "He was an intelligent and handsome man",
            "Elizabeth had been obliged to accept him",
            "Their visit afforded was the sight",
            "Mr Darcy soon drew the attention",
            "of the room by his fine person",
            "He was the proudest man in the world",
            "She is tolerable but not handsome enough",
            "I could easily forgive his pride",
            "The evening altogether passed off pleasantly",
            "I have been used to consider poetry",
            "as the food of love",
        ],
    },
    TextSource {
        name: "A Tale of Two Cities",
        author: "Charles Dickens",
        year: 1859,
        license: "Public Domain",
        attribution: "Text from 'A Tale of Two Cities' by Charles Dickens (1859), sourced from Project Gutenberg",
        sentences: &[
            "It was the best of times",
            "it was the worst of times",
            "it was the age of wisdom",
            "it was the age of foolishness",
            "it was the epoch of belief",
            "it was the epoch of incredulity",
            "it was the season of Light",
            "it was the season of Darkness",
            "it was the spring of hope",
            "it was the winter of despair",
            "we had everything before us",
            "we had nothing before us",
            "we were all going direct to Heaven",
            "we were all going direct the other way",
            "There were a king with a large jaw",
            "and a queen with a plain face",
            "In both countries it was clearer than crystal",
            "the state of public feeling",
            "France received the news by mail",
            "England had a certain authority",
        ],
    },
    TextSource {
        name: "The Adventures of Sherlock Holmes",
        author: "Arthur Conan Doyle",
        year: 1892,
        license: "Public Domain",
        attribution: "Text from 'The Adventures of Sherlock Holmes' by Arthur Conan Doyle (1892), sourced from Project Gutenberg",
        sentences: &[
            "To Sherlock Holmes she is always the woman",
            "I have seldom heard him mention her",
            "In his eyes she eclipses the whole of her sex",
            "He never spoke of softer passions",
            "They were admirable things for the observer",
            "But for the trained reasoner",
            "to admit such intrusions into his own mind",
            "was to introduce a distracting factor",
            "I had seen little of Holmes lately",
            "My marriage had drifted us away",
            "My own complete happiness",
            "absorbed all my attention",
            "He was buried in his chair",
            "reading and rereading a letter",
            "The note was undated",
            "and without signature or address",
            "There will call upon you tonight",
            "a gentleman who desires to consult",
            "Your recent services to the crown",
            "have shown that you may be trusted",
        ],
    },
    TextSource {
        name: "Moby Dick",
        author: "Herman Melville",
        year: 1851,
        license: "Public Domain",
        attribution: "Text from 'Moby Dick' by Herman Melville (1851), sourced from Project Gutenberg",
        sentences: &[
            "Call me Ishmael",
            "Some years ago never mind how long",
            "having little or no money in my purse",
            "and nothing particular to interest me",
            "I thought I would sail about a little",
            "and see the watery part of the world",
            "whenever I find myself growing grim",
            "whenever it is a damp drizzly November",
            "I account it high time to get to sea",
            "This is my substitute for pistol and ball",
            "There now is your insular city",
            "belted round by wharves as Indian isles",
            "Commerce surrounds it with her surf",
            "Right and left the streets take you",
            "Its extreme downtown is the battery",
            "where that noble mole is washed",
            "Look at the crowds of water gazers",
            "Circumambulate the city on a dreamy day",
            "Go from Corlears Hook to Coenties Slip",
            "What do you see there",
        ],
    },
    TextSource {
        name: "Alices Adventures in Wonderland",
        author: "Lewis Carroll",
        year: 1865,
        license: "Public Domain",
        attribution: "Text from 'Alice's Adventures in Wonderland' by Lewis Carroll (1865), sourced from Project Gutenberg",
        sentences: &[
            "Alice was beginning to get very tired",
            "of sitting by her sister on the bank",
            "and of having nothing to do",
            "once or twice she had peeped",
            "into the book her sister was reading",
            "but it had no pictures or conversations",
            "what is the use of a book",
            "without pictures or conversations",
            "So she was considering in her own mind",
            "whether the pleasure of making a daisy chain",
            "would be worth the trouble of getting up",
            "when suddenly a White Rabbit ran close by",
            "There was nothing so very remarkable",
            "nor did Alice think it so very odd",
            "to hear the Rabbit say to itself",
            "Oh dear Oh dear I shall be late",
            "but when the Rabbit took a watch",
            "out of its waistcoat pocket",
            "Alice started to her feet",
            "burning with curiosity she ran across",
        ],
    },
];

/// Human-readable attribution block for every work in the corpus.
pub fn attribution() -> String {
    let mut lines = vec![
        "Text sources used for training tasks (all Public Domain):".to_string(),
        String::new(),
    ];
    for source in SOURCES {
        lines.push(format!(
            "- '{}' by {} ({})",
            source.name, source.author, source.year
        ));
    }
    lines.push(String::new());
    lines.push("All texts sourced from Project Gutenberg (https://www.gutenberg.org)".to_string());
    lines.push("These works are in the public domain in the United States.".to_string());
    lines.join("\n")
}
