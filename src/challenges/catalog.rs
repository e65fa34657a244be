//! The built-in tutorials and challenges
//!
//! Tutorials are judged by trimmed expected-output equality. Each challenge
//! carries its own predicate over the output.

use super::registry::Registry;
use super::validator::{
    AllOf, AnyOf, ExpectedOutput, OutputContains, OutputContainsIgnoreCase, OutputMentionsAny,
    Validator,
};
use super::{Challenge, ChallengeKind};

/// Display text for one item
struct Content {
    id: &'static str,
    title: &'static str,
    emoji: &'static str,
    description: &'static str,
    hint: &'static str,
    starter: &'static str,
    solution: &'static str,
}

/// Tutorials, each with the exact output its example produces
const TUTORIALS: &[(Content, &str)] = &[
    (
        Content {
            id: "meet-python",
            title: "Let's Meet Python!",
            emoji: "🐍",
            description: "Python is a friendly programming language that makes it easy to tell computers what to do!\n\n\
                `print()` displays text on the screen. Put what you want to show inside the parentheses, \
                and put text inside quotes so Python knows it's text.\n\n\
                Run the code and see what happens!",
            hint: "Text goes inside quotes: print(\"like this\")",
            starter: "print(\"Hello, World!\")\n",
            solution: "print(\"Hello, World!\")\n",
        },
        "Hello, World!",
    ),
    (
        Content {
            id: "numbers-and-math",
            title: "Numbers and Math",
            emoji: "🧮",
            description: "Python is great at math. You can use it just like a calculator:\n\n\
                + adds, - subtracts, * multiplies and / divides.\n\n\
                How many cookies does each friend get if you have 20 cookies and 4 friends?",
            hint: "Dividing with / always gives a number with a decimal point, like 5.0",
            starter: "cookies = 20\nfriends = 4\ncookies_per_friend = cookies / friends\nprint(f'Each friend gets {cookies_per_friend} cookies!')\n",
            solution: "cookies = 20\nfriends = 4\ncookies_per_friend = cookies / friends\nprint(f'Each friend gets {cookies_per_friend} cookies!')\n",
        },
        "Each friend gets 5.0 cookies!",
    ),
    (
        Content {
            id: "variables",
            title: "Variables - Name and Remember!",
            emoji: "🏷️",
            description: "Variables are like labeled boxes where Python stores information for later.\n\n\
                Create one with a name, `=` and a value: age = 10\n\n\
                Make variables for your name and your favorite animal, then print a sentence using both!",
            hint: "Good variable names use lowercase letters and underscores, like favorite_animal",
            starter: "name = \"Kim\"\nfavorite_animal = \"dolphin\"\nprint(f\"My name is {name} and I love {favorite_animal}s!\")\n",
            solution: "name = \"Kim\"\nfavorite_animal = \"dolphin\"\nprint(f\"My name is {name} and I love {favorite_animal}s!\")\n",
        },
        "My name is Kim and I love dolphins!",
    ),
    (
        Content {
            id: "if-statements",
            title: "If Statements - Making Decisions!",
            emoji: "🔀",
            description: "Sometimes your program needs to make a decision. That's what `if` is for!\n\n\
                Compare with ==, !=, >, <, >= and <=. The lines that belong to the `if` are indented by 4 spaces.\n\n\
                Check whether a number is positive, negative, or zero.",
            hint: "Use if, elif and else to handle all three cases",
            starter: "number = 7\n\nif number > 0:\n    print(f'{number} is positive!')\nelif number < 0:\n    print(f'{number} is negative!')\nelse:\n    print('The number is zero!')\n",
            solution: "number = 7\n\nif number > 0:\n    print(f'{number} is positive!')\nelif number < 0:\n    print(f'{number} is negative!')\nelse:\n    print('The number is zero!')\n",
        },
        "7 is positive!",
    ),
    (
        Content {
            id: "loops",
            title: "Loops - Repeating Things!",
            emoji: "🔁",
            description: "Loops repeat code without writing it again and again.\n\n\
                A `for` loop repeats for each item, like `for i in range(5):`. \
                A `while` loop repeats as long as a condition is true.\n\n\
                Print a countdown from 5 to 1, then \"Blast off! 🚀\"",
            hint: "range(5, 0, -1) counts down: 5, 4, 3, 2, 1",
            starter: "for i in range(5, 0, -1):\n    print(i)\nprint('Blast off! 🚀')\n",
            solution: "for i in range(5, 0, -1):\n    print(i)\nprint('Blast off! 🚀')\n",
        },
        "5\n4\n3\n2\n1\nBlast off! 🚀",
    ),
    (
        Content {
            id: "lists",
            title: "Lists - Storing Multiple Items!",
            emoji: "📝",
            description: "Lists store many items in one variable: fruits = [\"apple\", \"banana\"]\n\n\
                Get an item by its position. Python starts counting at 0, so fruits[0] is \"apple\". \
                Add items with append() and count them with len().\n\n\
                Make a list of three favorite things, then loop through and print them!",
            hint: "for thing in favorite_things: visits every item in the list",
            starter: "favorite_things = [\"robots\", \"ice cream\", \"swimming\"]\n\nfor thing in favorite_things:\n    print(f\"I really love {thing}!\")\n",
            solution: "favorite_things = [\"robots\", \"ice cream\", \"swimming\"]\n\nfor thing in favorite_things:\n    print(f\"I really love {thing}!\")\n",
        },
        "I really love robots!\nI really love ice cream!\nI really love swimming!",
    ),
    (
        Content {
            id: "functions",
            title: "Functions - Create Your Own Commands!",
            emoji: "🔧",
            description: "Functions are mini-programs inside your program. Create one with `def`:\n\n\
                def greet(name):\n    print(f\"Hello, {name}!\")\n\n\
                Functions can take parameters and give back values with `return`.\n\n\
                Write a function that takes a name and a favorite color and prints a message about them.",
            hint: "Call your function once for each person",
            starter: "def describe_person(name, favorite_color):\n    print(f\"{name}'s favorite color is {favorite_color}!\")\n\ndescribe_person(\"Max\", \"blue\")\ndescribe_person(\"Lily\", \"purple\")\n",
            solution: "def describe_person(name, favorite_color):\n    print(f\"{name}'s favorite color is {favorite_color}!\")\n\ndescribe_person(\"Max\", \"blue\")\ndescribe_person(\"Lily\", \"purple\")\n",
        },
        "Max's favorite color is blue!\nLily's favorite color is purple!",
    ),
];

const ANIMALS: &[&str] = &[
    "dog", "cat", "tiger", "lion", "dolphin", "turtle", "rabbit", "bear", "bird", "fish", "panda",
    "monkey", "elephant", "giraffe", "zebra", "dinosaur", "dragon", "unicorn",
];

const HELLO_PYTHON: Content = Content {
    id: "hello-python",
    title: "Hello, Python!",
    emoji: "👋",
    description: "Can you write a program that says hello to your favorite animal?\n\n\
        1. Use the print() function\n\
        2. Put a greeting message in quotes inside it\n\
        3. Include your favorite animal in the message\n\n\
        Example: Hello, dolphin! You're awesome!",
    hint: "Remember to put your text inside quotes in the print function!",
    starter: "# Write your code here\nprint(\"Hello, \")\n",
    solution: "print(\"Hello, tiger! You're awesome!\")\n",
};

const MATH_MAGIC: Content = Content {
    id: "math-magic",
    title: "Math Magic",
    emoji: "🧙",
    description: "Can you cast a spell that counts all the legs in a magical zoo?\n\n\
        - 3 unicorns (4 legs each)\n\
        - 2 dragons (4 legs each)\n\
        - 5 fairies (2 legs each)\n\n\
        Create variables for each animal, calculate the total number of legs and print it.",
    hint: "Multiply the number of each animal by their number of legs, then add them together!",
    starter: "# Create your variables\nunicorns = 3\ndragons = 2\nfairies = 5\n\n# Calculate total legs\n\n\n# Print the result\n",
    solution: "unicorns = 3\ndragons = 2\nfairies = 5\n\n# Calculate total legs\nunicorn_legs = unicorns * 4\ndragon_legs = dragons * 4\nfairy_legs = fairies * 2\ntotal_legs = unicorn_legs + dragon_legs + fairy_legs\n\n# Print the result\nprint(f\"The magical zoo has {total_legs} legs in total!\")\n",
};

const NAME_WIZARD: Content = Content {
    id: "name-wizard",
    title: "Name Wizard",
    emoji: "✨",
    description: "Can you turn any name into a magical wizard name?\n\n\
        1. Create a variable with your name\n\
        2. Build a wizard name by adding \"the\" in the middle and a magical word at the end\n\
        3. Print the wizard name\n\n\
        Example: Alex the Magnificent",
    hint: "Use the + operator to combine strings together! Don't forget spaces between words.",
    starter: "# Set up your name\nmy_name = \"Alex\"\n\n# Create wizard name\n\n\n# Print the wizard name\n",
    solution: "my_name = \"Alex\"\n\n# Create wizard name\nwizard_title = \"the\"\nwizard_power = \"Magnificent\"\nwizard_name = my_name + \" \" + wizard_title + \" \" + wizard_power\n\n# Print the wizard name\nprint(wizard_name)\n",
};

const SECRET_CODE: Content = Content {
    id: "secret-code",
    title: "Secret Code Generator",
    emoji: "🔐",
    description: "Can you turn a word into a secret code?\n\n\
        1. Start from the secret word (already done for you)\n\
        2. Reverse the word and add \"00\" to the end\n\
        3. Print the secret code\n\n\
        Example: \"python\" becomes \"nohtyp00\"",
    hint: "You can reverse a string in Python using: reversed_word = secret_word[::-1]",
    starter: "# We've created the secret word for you\nsecret_word = \"python\"\n\n# Your code to create the secret code goes here\n\n\n# Print the secret code\n",
    solution: "secret_word = \"python\"\n\n# Create secret code\nreversed_word = secret_word[::-1]\nsecret_code = reversed_word + \"00\"\n\n# Print the secret code\nprint(f\"The secret code is: {secret_code}\")\n",
};

const TREASURE_HUNT: Content = Content {
    id: "treasure-hunt",
    title: "Treasure Hunt",
    emoji: "🗺️",
    description: "You're on a treasure hunt! Tell the explorer whether they found the treasure.\n\n\
        1. Your position on the map is (x, y)\n\
        2. The treasure is hidden at (5, 3)\n\
        3. Use an if statement to check whether you're standing on it\n\
        4. Print whether you found the treasure or not",
    hint: "Use an if statement to check if both x == treasure_x AND y == treasure_y",
    starter: "# Your current position\nx = 5  # Try changing these values!\ny = 3\n\n# Treasure position\ntreasure_x = 5\ntreasure_y = 3\n\n# Check if you found the treasure\n\n",
    solution: "# Your current position\nx = 5\ny = 3\n\n# Treasure position\ntreasure_x = 5\ntreasure_y = 3\n\n# Check if you found the treasure\nif x == treasure_x and y == treasure_y:\n    print(\"Hooray! You found the treasure! 💰\")\nelse:\n    print(f\"No treasure here. Keep looking! You're at ({x}, {y})\")\n",
};

const ANIMAL_SOUNDS: Content = Content {
    id: "animal-sounds",
    title: "Animal Sounds Loop",
    emoji: "🔊",
    description: "Can you make a chorus of animal sounds with a loop?\n\n\
        1. Keep a dictionary of animal emoji and their sounds\n\
        2. Loop through it and print each sound three times\n\
        3. Put the animal emoji before each sound\n\n\
        Example:\n🐶 Woof! Woof! Woof!\n🐱 Meow! Meow! Meow!",
    hint: "Try using a for loop to go through the dictionary items(). For each emoji and sound, repeat the sound 3 times.",
    starter: "# Create your animal dictionary (emoji and sound)\nanimals = {\n    '🐶': 'Woof!',\n    '🐱': 'Meow!',\n    '🐮': 'Moo!'\n}\n\n# Now loop through and print each sound three times\n",
    solution: "# Create your animal dictionary\nanimals = {\n    '🐶': 'Woof!',\n    '🐱': 'Meow!',\n    '🐮': 'Moo!'\n}\n\n# Loop through animals\nfor emoji, sound in animals.items():\n    # Print the emoji and the sound three times\n    print(f\"{emoji} {sound} {sound} {sound}\")\n",
};

const POTION_MIXER: Content = Content {
    id: "potion-mixer",
    title: "Magic Potion Mixer",
    emoji: "🧪",
    description: "Help a wizard mix magical potions!\n\n\
        1. Create a function called mix_potion\n\
        2. It takes two ingredients as parameters\n\
        3. It returns a string saying what potion was created\n\
        4. Call it with different ingredient combinations and print the results\n\n\
        Example: mix_potion(\"dragon scales\", \"unicorn hair\") might give \"You created a Potion of Flying!\"",
    hint: "You can use if/elif statements to check different ingredient combinations, or create a dictionary of recipe combinations!",
    starter: "# Define your mix_potion function\ndef mix_potion(ingredient1, ingredient2):\n    # Your code here\n    pass\n\n# Test your function\nresult1 = mix_potion(\"dragon scales\", \"unicorn hair\")\nprint(result1)\n\nresult2 = mix_potion(\"toad eyes\", \"butterfly wings\")\nprint(result2)\n",
    solution: "def mix_potion(ingredient1, ingredient2):\n    # Ingredient combinations and what they make\n    recipes = {\n        (\"dragon scales\", \"unicorn hair\"): \"Potion of Flying\",\n        (\"unicorn hair\", \"dragon scales\"): \"Potion of Flying\",\n        (\"toad eyes\", \"butterfly wings\"): \"Potion of Invisibility\",\n        (\"butterfly wings\", \"toad eyes\"): \"Potion of Invisibility\",\n    }\n\n    if (ingredient1, ingredient2) in recipes:\n        return f\"You created a {recipes[(ingredient1, ingredient2)]}!\"\n    elif (ingredient2, ingredient1) in recipes:\n        return f\"You created a {recipes[(ingredient2, ingredient1)]}!\"\n    else:\n        return f\"You mixed {ingredient1} and {ingredient2} and created... a puff of smoke!\"\n\nresult1 = mix_potion(\"dragon scales\", \"unicorn hair\")\nprint(result1)\n\nresult2 = mix_potion(\"toad eyes\", \"butterfly wings\")\nprint(result2)\n",
};

fn build(kind: ChallengeKind, content: &Content, validator: Box<dyn Validator>) -> Challenge {
    Challenge {
        id: content.id.to_string(),
        kind,
        title: content.title.to_string(),
        emoji: content.emoji.to_string(),
        description: content.description.to_string(),
        hint: content.hint.to_string(),
        starter_source: content.starter.to_string(),
        solution: content.solution.to_string(),
        validator,
    }
}

fn reversed(word: &str) -> String {
    word.chars().rev().collect()
}

fn challenges() -> Vec<Challenge> {
    let hello = AllOf::new()
        .with(OutputContainsIgnoreCase::new("hello"))
        .with(OutputMentionsAny::new(ANIMALS.iter().copied()));

    let wizard = |_: &str, output: &str| {
        output.to_lowercase().contains(" the ") && output.split_whitespace().count() >= 3
    };

    let reversed_words: AnyOf = ["python", "code", "secret"]
        .iter()
        .map(|word| Box::new(OutputContains::new(reversed(word))) as Box<dyn Validator>)
        .collect();
    let secret = AllOf::new()
        .with(reversed_words)
        .with(OutputContains::new("00"));

    let treasure = AnyOf::new()
        .with(
            AllOf::new()
                .with(OutputContainsIgnoreCase::new("found the treasure"))
                .with(OutputContainsIgnoreCase::new("hooray")),
        )
        .with(
            AllOf::new()
                .with(OutputContainsIgnoreCase::new("no treasure"))
                .with(OutputContainsIgnoreCase::new("keep looking")),
        );

    let sounds: AllOf = ["🐶", "🐱", "Woof!", "Meow!"]
        .iter()
        .map(|needle| Box::new(OutputContains::new(*needle)) as Box<dyn Validator>)
        .collect();

    let potion = AllOf::new()
        .with(OutputContainsIgnoreCase::new("created a"))
        .with(OutputMentionsAny::new(["potion", "smoke"]));

    let kind = ChallengeKind::Challenge;
    vec![
        build(kind, &HELLO_PYTHON, Box::new(hello)),
        build(kind, &MATH_MAGIC, Box::new(OutputContains::new("30"))),
        build(kind, &NAME_WIZARD, Box::new(wizard)),
        build(kind, &SECRET_CODE, Box::new(secret)),
        build(kind, &TREASURE_HUNT, Box::new(treasure)),
        build(kind, &ANIMAL_SOUNDS, Box::new(sounds)),
        build(kind, &POTION_MIXER, Box::new(potion)),
    ]
}

/// Every built-in item: tutorials first, then challenges
pub fn catalog() -> Registry {
    let mut registry = Registry::new();
    let tutorials = TUTORIALS.iter().map(|(content, expected)| {
        build(
            ChallengeKind::Tutorial,
            content,
            Box::new(ExpectedOutput::new(*expected)),
        )
    });

    for item in tutorials.chain(challenges()) {
        if let Err(err) = registry.insert(item) {
            tracing::warn!("Skipping catalog entry: {}", err);
        }
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_sizes() {
        let registry = catalog();
        assert_eq!(registry.count_of_kind(ChallengeKind::Tutorial), 7);
        assert_eq!(registry.count_of_kind(ChallengeKind::Challenge), 7);
        assert_eq!(registry.get_index(0).map(|c| c.id.as_str()), Some("meet-python"));
        assert_eq!(registry.get_index(7).map(|c| c.id.as_str()), Some("hello-python"));
    }

    #[test]
    fn test_challenge_predicates() {
        let registry = catalog();
        let check = |id: &str, output: &str| registry.get(id).unwrap().validate("", output);

        assert!(check("hello-python", "Hello, Tiger!\n"));
        assert!(!check("hello-python", "Hello, friend!\n"));
        assert!(check("math-magic", "30\n"));
        assert!(check("name-wizard", "Alex the Great\n"));
        assert!(!check("name-wizard", "Alexthe Great\n"));
        assert!(check("secret-code", "edoc00\n"));
        assert!(!check("secret-code", "python00\n"));
        assert!(check("treasure-hunt", "No treasure here. Keep looking!\n"));
        assert!(!check("treasure-hunt", "Hooray!\n"));
        assert!(check("animal-sounds", "🐶 Woof!\n🐱 Meow!\n"));
        assert!(check("potion-mixer", "You mixed a and b and created a puff of smoke!\n"));
        assert!(!check("potion-mixer", "None\nNone\n"));
    }

    #[test]
    fn test_tutorials_compare_trimmed_output() {
        let registry = catalog();
        let loops = registry.get("loops").unwrap();
        assert!(loops.validate("", "5\n4\n3\n2\n1\nBlast off! 🚀\n"));
        assert!(!loops.validate("", "5\n4\n3\n2\n1\n"));
    }
}
