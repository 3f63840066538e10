use super::CatalogError;
use crate::model::{
    Achievement, AchievementId, Lesson, LessonId, QUIZ_MASTER, QuestionId, QuizQuestion, Realm,
    RealmId, TheoryBlock, TheoryBlockId,
};

fn block(id: &str, title: &str, content: &str) -> TheoryBlock {
    TheoryBlock::text(TheoryBlockId::new(id), title, content)
}

fn question(
    lesson: &str,
    id: &str,
    text: &str,
    options: &[&str],
    correct: usize,
    explanation: &str,
) -> Result<QuizQuestion, CatalogError> {
    QuizQuestion::new(
        QuestionId::new(id),
        text,
        options.iter().map(|o| (*o).to_owned()).collect(),
        correct,
        explanation,
    )
    .map_err(|source| CatalogError::Question {
        lesson: LessonId::new(lesson),
        source,
    })
}

fn lesson(id: &str, title: &str, description: &str, order: u32) -> Lesson {
    Lesson::new(LessonId::new(id), title, description, order)
}

pub(super) fn realms() -> Result<Vec<Realm>, CatalogError> {
    Ok(vec![math()?, physics()?, programming()?])
}

pub(super) fn achievements() -> Vec<Achievement> {
    vec![
        Achievement::new(
            AchievementId::new("first-lesson"),
            "First Steps",
            "Complete your first lesson",
            "star",
            "#F6AD55",
        ),
        Achievement::new(
            AchievementId::new("streak-7"),
            "Week Warrior",
            "Maintain a 7-day learning streak",
            "flame",
            "#F56565",
        ),
        Achievement::new(
            AchievementId::new(QUIZ_MASTER),
            "Quiz Master",
            "Get 100% on any quiz",
            "trophy",
            "#48BB78",
        ),
    ]
}

// ─── Mathematics ───────────────────────────────────────────────────────────────

#[allow(clippy::too_many_lines)]
fn math() -> Result<Realm, CatalogError> {
    let algebra = lesson(
        "algebra-basics",
        "Algebra Basics",
        "Learn the fundamentals of algebraic expressions",
        1,
    )
    .with_theory_blocks(vec![
        block(
            "tb1",
            "Introduction to Variables",
            "Variables are symbols (usually letters) that represent unknown values in mathematical expressions. They allow us to write general rules and solve problems with unknown quantities.",
        ),
        block(
            "tb2",
            "Basic Operations with Variables",
            "Learn how to perform addition, subtraction, multiplication, and division with variables. These operations follow the same rules as with numbers, but we need to be careful with like terms.",
        ),
        block(
            "tb3",
            "Solving Simple Equations",
            "An equation is a statement that two expressions are equal. To solve an equation, we need to find the value of the variable that makes the equation true.",
        ),
    ])
    .with_quiz(vec![
        question(
            "algebra-basics",
            "q1",
            "What is the value of x in the equation: 2x + 5 = 13?",
            &["x = 3", "x = 4", "x = 5", "x = 6"],
            1,
            "To solve 2x + 5 = 13, subtract 5 from both sides: 2x = 8, then divide by 2: x = 4",
        )?,
        question(
            "algebra-basics",
            "q2",
            "Which of the following is a linear equation?",
            &["x² + 2x + 1 = 0", "2x + 3 = 7", "x³ = 8", "√x = 4"],
            1,
            "A linear equation has the form ax + b = c, where a, b, and c are constants and x is the variable. 2x + 3 = 7 is the only option that fits this form.",
        )?,
    ]);

    let quadratic = lesson(
        "quadratic-equations",
        "Quadratic Equations",
        "Master solving quadratic equations and their applications",
        2,
    )
    .with_theory_blocks(vec![
        block(
            "tb1",
            "What are Quadratic Equations?",
            "A quadratic equation is an equation of the form ax² + bx + c = 0, where a, b, and c are constants and a ≠ 0. These equations are fundamental in algebra and have wide applications in physics, engineering, and other fields.",
        ),
        block(
            "tb2",
            "The Quadratic Formula",
            "The quadratic formula is a powerful tool for solving any quadratic equation. It is derived from completing the square and provides a direct way to find the solutions.",
        ),
        block(
            "tb3",
            "Understanding the Discriminant",
            "The discriminant (b² - 4ac) tells us about the nature of the solutions. If it's positive, we have two real solutions; if zero, one real solution; if negative, two complex solutions.",
        ),
    ])
    .with_quiz(vec![question(
        "quadratic-equations",
        "q1",
        "What is the quadratic formula?",
        &[
            "x = (-b ± √(b² - 4ac)) / 2a",
            "x = (-b ± √(b² + 4ac)) / 2a",
            "x = (b ± √(b² - 4ac)) / 2a",
            "x = (-b ± √(b² - 4ac)) / a",
        ],
        0,
        "The quadratic formula is x = (-b ± √(b² - 4ac)) / 2a, where a, b, and c are the coefficients of the quadratic equation ax² + bx + c = 0.",
    )?]);

    let polynomials = lesson(
        "polynomials",
        "Polynomials",
        "Learn about polynomial expressions and their properties",
        3,
    )
    .with_theory_blocks(vec![block(
        "tb1",
        "Polynomials",
        "Polynomials are expressions consisting of variables and coefficients, involving only the operations of addition, subtraction, multiplication, and non-negative integer exponents. They are fundamental in algebra and have applications in many areas of mathematics and science.",
    )])
    .with_quiz(vec![
        question(
            "polynomials",
            "q1",
            "What is the degree of the polynomial 3x⁴ + 2x² - 5x + 1?",
            &["2", "3", "4", "5"],
            2,
            "The degree of a polynomial is the highest power of the variable. In this case, the highest power is 4 (from the term 3x⁴).",
        )?,
        question(
            "polynomials",
            "q2",
            "What is the result of (x + 2)(x - 2)?",
            &["x² - 4", "x² + 4", "x² - 2", "x² + 2"],
            0,
            "This is a difference of squares: (x + 2)(x - 2) = x² - 4. The middle terms cancel out.",
        )?,
        question(
            "polynomials",
            "q3",
            "What is the remainder when x³ - 2x² + 3x - 4 is divided by (x - 1)?",
            &["-2", "-1", "0", "1"],
            0,
            "Using the Remainder Theorem, we substitute x = 1 into the polynomial: 1³ - 2(1)² + 3(1) - 4 = 1 - 2 + 3 - 4 = -2",
        )?,
    ]);

    let geometry = lesson(
        "geometry-intro",
        "Introduction to Geometry",
        "Explore the world of shapes and spaces",
        4,
    )
    .with_theory_blocks(vec![block(
        "tb1",
        "Introduction to Geometry",
        "Geometry is a branch of mathematics concerned with questions of shape, size, relative position of figures, and the properties of space. It is one of the oldest branches of mathematics.",
    )])
    .with_quiz(vec![
        question(
            "geometry-intro",
            "q1",
            "What is the sum of the interior angles of a triangle?",
            &["90 degrees", "180 degrees", "270 degrees", "360 degrees"],
            1,
            "The sum of the interior angles of any triangle is always 180 degrees. This is a fundamental property of triangles in Euclidean geometry.",
        )?,
        question(
            "geometry-intro",
            "q2",
            "Which of the following is not a quadrilateral?",
            &["Square", "Rectangle", "Triangle", "Rhombus"],
            2,
            "A quadrilateral is a polygon with four sides. A triangle has three sides, so it cannot be a quadrilateral.",
        )?,
        question(
            "geometry-intro",
            "q3",
            "What is the formula for the area of a circle?",
            &["2πr", "πr²", "2πr²", "πr"],
            1,
            "The area of a circle is calculated using the formula A = πr², where r is the radius of the circle.",
        )?,
    ]);

    let functions = lesson(
        "functions-graphs",
        "Functions and Graphs",
        "Learn about mathematical functions and their graphical representations",
        5,
    )
    .with_theory_blocks(vec![block(
        "tb1",
        "Functions and Graphs",
        "Functions are mathematical relationships between inputs and outputs. They can be represented graphically, showing how the output changes with different inputs. Understanding functions and their graphs is essential for advanced mathematics and many real-world applications.",
    )])
    .with_quiz(vec![
        question(
            "functions-graphs",
            "q1",
            "What is the general form of a linear function?",
            &["y = mx + b", "y = ax² + bx + c", "y = sin(x)", "y = log(x)"],
            0,
            "A linear function has the form y = mx + b, where m is the slope and b is the y-intercept. This creates a straight line when graphed.",
        )?,
        question(
            "functions-graphs",
            "q2",
            "What is the domain of the function f(x) = √x?",
            &["All real numbers", "x ≥ 0", "x > 0", "x ≤ 0"],
            1,
            "The domain of √x is x ≥ 0 because you cannot take the square root of a negative number in real numbers.",
        )?,
        question(
            "functions-graphs",
            "q3",
            "What type of function is f(x) = x²?",
            &["Linear", "Quadratic", "Exponential", "Logarithmic"],
            1,
            "f(x) = x² is a quadratic function because it has the form f(x) = ax² + bx + c, where a = 1, b = 0, and c = 0.",
        )?,
        question(
            "functions-graphs",
            "q4",
            "What is the range of the function f(x) = x²?",
            &["All real numbers", "y ≥ 0", "y > 0", "y ≤ 0"],
            1,
            "The range of f(x) = x² is y ≥ 0 because squaring any real number always gives a non-negative result.",
        )?,
    ]);

    Ok(Realm::new(
        RealmId::new("math"),
        "Mathematics",
        "Master the fundamentals of mathematics",
        "calculator",
        "#6B46C1",
    )
    .with_lessons(vec![algebra, quadratic, polynomials, geometry, functions]))
}

// ─── Physics ───────────────────────────────────────────────────────────────────

fn physics() -> Result<Realm, CatalogError> {
    let mechanics = lesson(
        "mechanics",
        "Classical Mechanics",
        "Learn about motion, forces, and energy",
        1,
    )
    .with_theory_blocks(vec![block(
        "tb1",
        "Classical Mechanics",
        "Classical mechanics is the study of the motion of objects and the forces that cause them to move. It is based on Newton's laws of motion and forms the foundation of physics.",
    )])
    .with_quiz(vec![
        question(
            "mechanics",
            "q1",
            "What is Newton's First Law also known as?",
            &[
                "Law of Acceleration",
                "Law of Inertia",
                "Law of Action-Reaction",
                "Law of Universal Gravitation",
            ],
            1,
            "Newton's First Law is also known as the Law of Inertia. It states that an object will remain at rest or in uniform motion unless acted upon by an external force.",
        )?,
        question(
            "mechanics",
            "q2",
            "What is the SI unit of force?",
            &["Joule", "Watt", "Newton", "Pascal"],
            2,
            "The Newton (N) is the SI unit of force. It is defined as the force needed to accelerate one kilogram of mass at the rate of one meter per second squared.",
        )?,
        question(
            "mechanics",
            "q3",
            "What is the formula for kinetic energy?",
            &["mgh", "½mv²", "Fd", "ma"],
            1,
            "The formula for kinetic energy is KE = ½mv², where m is mass and v is velocity.",
        )?,
    ]);

    let thermodynamics = lesson(
        "thermodynamics",
        "Thermodynamics",
        "Understand heat, energy, and entropy",
        2,
    )
    .with_theory_blocks(vec![block(
        "tb1",
        "Thermodynamics",
        "Thermodynamics is the branch of physics that deals with the relationships between heat, work, temperature, and energy. It is fundamental to understanding how energy is transferred and transformed.",
    )])
    .with_quiz(vec![
        question(
            "thermodynamics",
            "q1",
            "What is the First Law of Thermodynamics?",
            &[
                "Energy cannot be created or destroyed",
                "Entropy always increases",
                "Heat flows from cold to hot",
                "Pressure and volume are inversely proportional",
            ],
            0,
            "The First Law of Thermodynamics states that energy cannot be created or destroyed, only transformed from one form to another.",
        )?,
        question(
            "thermodynamics",
            "q2",
            "What is the SI unit of temperature?",
            &["Fahrenheit", "Celsius", "Kelvin", "Rankine"],
            2,
            "The Kelvin (K) is the SI unit of temperature. It is an absolute temperature scale where 0 K represents absolute zero.",
        )?,
        question(
            "thermodynamics",
            "q3",
            "Which of the following is a state function?",
            &["Work", "Heat", "Internal Energy", "Power"],
            2,
            "Internal energy is a state function, meaning its value depends only on the current state of the system, not on how the system reached that state.",
        )?,
    ]);

    Ok(Realm::new(
        RealmId::new("physics"),
        "Physics",
        "Discover the laws that govern our universe",
        "flash",
        "#4299E1",
    )
    .with_lessons(vec![mechanics, thermodynamics]))
}

// ─── Programming ───────────────────────────────────────────────────────────────

fn programming() -> Result<Realm, CatalogError> {
    let python = lesson(
        "python-basics",
        "Python Fundamentals",
        "Start your programming journey with Python",
        1,
    )
    .with_theory_blocks(vec![block(
        "tb1",
        "Python Fundamentals",
        "Python is a high-level, interpreted programming language known for its simplicity and readability. It's widely used in web development, data science, artificial intelligence, and more.",
    )])
    .with_quiz(vec![
        question(
            "python-basics",
            "q1",
            "What is the correct way to create a variable in Python?",
            &["var x = 5", "x := 5", "x = 5", "let x = 5"],
            2,
            "In Python, variables are created by simply assigning a value using the = operator. No special keyword is needed.",
        )?,
        question(
            "python-basics",
            "q2",
            "Which of the following is a valid Python data type?",
            &["Array", "Vector", "List", "Set"],
            2,
            "List is a built-in data type in Python. It is an ordered, mutable sequence of elements.",
        )?,
        question(
            "python-basics",
            "q3",
            "What is the output of print(type(5))?",
            &[
                "<class 'number'>",
                "<class 'int'>",
                "<class 'integer'>",
                "<class 'float'>",
            ],
            1,
            "In Python, the type() function returns the class of an object. For the integer 5, it returns <class 'int'>.",
        )?,
    ]);

    let web = lesson("web-dev", "Web Development", "Build modern web applications", 2)
        .with_theory_blocks(vec![block(
            "tb1",
            "Web Development",
            "Web development involves creating websites and web applications using various technologies like HTML, CSS, and JavaScript. It's a fundamental skill for modern software development.",
        )])
        .with_quiz(vec![
            question(
                "web-dev",
                "q1",
                "What does HTML stand for?",
                &[
                    "Hyper Text Markup Language",
                    "High Tech Modern Language",
                    "Hyper Transfer Markup Language",
                    "Hyper Text Modern Language",
                ],
                0,
                "HTML stands for Hyper Text Markup Language. It is the standard markup language for creating web pages.",
            )?,
            question(
                "web-dev",
                "q2",
                "Which of the following is a CSS selector?",
                &["#id", "@media", "function()", "import"],
                0,
                "#id is a CSS selector that targets elements with a specific ID. The # symbol is used to select elements by their ID attribute.",
            )?,
            question(
                "web-dev",
                "q3",
                "What is the correct way to declare a JavaScript variable?",
                &["variable x = 5", "v x = 5", "let x = 5", "x = 5"],
                2,
                "In modern JavaScript, variables are typically declared using the let keyword. This provides block scope and prevents redeclaration.",
            )?,
        ]);

    Ok(Realm::new(
        RealmId::new("programming"),
        "Programming",
        "Learn to code and build applications",
        "code",
        "#48BB78",
    )
    .with_lessons(vec![python, web]))
}
