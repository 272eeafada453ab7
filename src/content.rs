//! Static page copy and asset references.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Asset {
    pub src: &'static str,
    pub alt: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardBody {
    Text(&'static str),
    Points(&'static [&'static str]),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Card {
    pub title: &'static str,
    pub body: CardBody,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CardSection {
    pub id: &'static str,
    pub class: &'static str,
    pub heading: &'static str,
    pub cards: &'static [Card],
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProfileLink {
    pub label: &'static str,
    pub href: &'static str,
    pub icon: Asset,
    pub accent: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkSection {
    pub id: &'static str,
    pub class: &'static str,
    pub heading: &'static str,
    pub lead: &'static str,
    pub link: ProfileLink,
}

pub const PHOTO: Asset = Asset {
    src: "/assets/arnav.jpg",
    alt: "Arnav",
};
pub const PHOTO_SIZE_PX: u32 = 200;

pub const ABOUT_HEADING: &str = "About Me";
pub const ABOUT_TEXT: &str = "I'm Arnav, a passionate developer pushing the boundaries \
     of creativity and technology. Welcome to my portfolio!";

pub const GITHUB: ProfileLink = ProfileLink {
    label: "github.com/7arnav1",
    href: "https://github.com/7arnav1",
    icon: Asset {
        src: "/assets/logo1.png",
        alt: "GitHub",
    },
    accent: "#ff66ff",
};

pub const LINKEDIN: ProfileLink = ProfileLink {
    label: "linkedin.com/in/arnav-srivastav",
    href: "https://www.linkedin.com/in/arnav-srivastav/",
    icon: Asset {
        src: "/assets/logo.png",
        alt: "LinkedIn",
    },
    accent: "#66ff66",
};

pub const STRENGTHS: CardSection = CardSection {
    id: "skills-heading",
    class: "skills-section",
    heading: "Key Strengths",
    cards: &[
        Card {
            title: "Strong CS Background",
            body: CardBody::Points(&[
                "In-depth knowledge of multiple programming languages (Java, Python, C++, etc.)",
                "Tutored CS, reinforcing core concepts and fundamentals",
                "Developed real-world solutions in various environments (backend, system-level, etc.)",
            ]),
        },
        Card {
            title: "Leadership",
            body: CardBody::Points(&[
                "Executive team member (President elect) at YesUW, organizing events for hundreds, \
                 encouraging people to go outside their comfort zones and connect with strangers.",
                "Building Manager at Wisconsin Union, overseeing daily operations, ensuring smooth \
                 functionality and adherence to safety protocols. Gained valuable experience in \
                 team management, problem-solving, and decision-making.",
            ]),
        },
        Card {
            title: "Teaching & Mentorship",
            body: CardBody::Points(&[
                "Guided 500+ students in foundational AI (search algorithms, optimization, \
                 reinforcement learning) through 1-on-1 and group sessions.",
                "Improved success rates by offering detailed feedback on large-scale programming \
                 projects and clarifying advanced concepts.",
            ]),
        },
    ],
};

pub const CURRENT_PROJECTS: CardSection = CardSection {
    id: "current-projects-heading",
    class: "current-project-section",
    heading: "Current Projects",
    cards: &[
        Card {
            title: "Home Services App (TBA)",
            body: CardBody::Text("Project in progress\u{2014}details forthcoming."),
        },
        Card {
            title: "AIvestor",
            body: CardBody::Points(&[
                "Developing a reinforcement learning model to optimize portfolio allocation by \
                 maximizing returns and minimizing risks.",
                "Implemented Proximal Policy Optimization, leveraging Yahoo Finance to train the \
                 RL agent on historical data.",
                "Creating an interactive dashboard using Matplotlib and Plotly to visualize \
                 portfolio performance and allocation trends.",
            ]),
        },
        Card {
            title: "Sponta",
            body: CardBody::Text(
                "An app that encourages users to seek discomfort and embrace spontaneity.",
            ),
        },
    ],
};

pub const PAST_PROJECTS: LinkSection = LinkSection {
    id: "projects-heading",
    class: "projects-section",
    heading: "Past Projects",
    lead: "Check out my GitHub to see some of my past work:",
    link: GITHUB,
};

pub const CONNECT: LinkSection = LinkSection {
    id: "connect-heading",
    class: "connect-section",
    heading: "Connect With Me",
    lead: "Feel free to connect with me on LinkedIn:",
    link: LINKEDIN,
};

pub const CARD_SECTIONS: [CardSection; 2] = [STRENGTHS, CURRENT_PROJECTS];
pub const LINK_SECTIONS: [LinkSection; 2] = [PAST_PROJECTS, CONNECT];
