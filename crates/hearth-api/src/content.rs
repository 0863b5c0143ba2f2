//! Static site content and form option lists compiled into the binary.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Service {
    pub slug: &'static str,
    pub name: &'static str,
    pub summary: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Faq {
    pub question: &'static str,
    pub answer: &'static str,
}

pub const SERVICES: &[Service] = &[
    Service {
        slug: "assisted-living",
        name: "Assisted Living",
        summary: "Private rooms with help for daily activities such as dressing, bathing and medication reminders.",
    },
    Service {
        slug: "memory-care",
        name: "Memory Care",
        summary: "A secure wing with staff trained in dementia and Alzheimer's care, and structured daily routines.",
    },
    Service {
        slug: "respite-care",
        name: "Respite Care",
        summary: "Short stays of a few days to several weeks while family caregivers rest or travel.",
    },
    Service {
        slug: "skilled-nursing",
        name: "Skilled Nursing",
        summary: "Round-the-clock licensed nursing for residents with complex medical needs.",
    },
    Service {
        slug: "rehabilitation",
        name: "Rehabilitation",
        summary: "Physical and occupational therapy after a hospital stay, surgery or fall.",
    },
    Service {
        slug: "palliative-care",
        name: "Palliative Care",
        summary: "Comfort-focused care and family support for residents with serious illness.",
    },
];

pub const FAQS: &[Faq] = &[
    Faq {
        question: "Can we visit before deciding?",
        answer: "Yes. Book a tour through the inquiry form and a member of our admissions team will show you around.",
    },
    Faq {
        question: "What are the visiting hours?",
        answer: "Families are welcome every day from 9am to 8pm. Visits outside those hours can be arranged with the nurse in charge.",
    },
    Faq {
        question: "Do residents bring their own furniture?",
        answer: "Residents are encouraged to bring familiar items. Rooms come furnished, and we help arrange anything you bring.",
    },
    Faq {
        question: "How are medications managed?",
        answer: "Licensed nurses administer and record every medication. We coordinate refills with the resident's pharmacy and physician.",
    },
    Faq {
        question: "Is there a waiting list?",
        answer: "Availability changes week to week. Submit an admission inquiry and we will tell you how soon a room can be offered.",
    },
    Faq {
        question: "What happens if care needs change?",
        answer: "We reassess each resident regularly and adjust the care plan with the family. Most changes can be handled without moving.",
    },
];

pub const CARE_SERVICES: &[&str] = &[
    "Assisted Living",
    "Memory Care",
    "Respite Care",
    "Skilled Nursing",
    "Rehabilitation",
    "Palliative Care",
];

pub const MEDICAL_CONDITIONS: &[&str] = &[
    "Alzheimer's / Dementia",
    "Arthritis",
    "COPD",
    "Diabetes",
    "Heart Disease",
    "Hypertension",
    "Incontinence",
    "Osteoporosis",
    "Parkinson's Disease",
    "Stroke",
    "None",
];

pub const MOVE_IN_TIMELINES: &[&str] = &[
    "Immediately",
    "Within 1 month",
    "1-3 months",
    "3-6 months",
    "Just exploring options",
];

pub const REFERRAL_SOURCES: &[&str] = &[
    "Search engine",
    "Social media",
    "Friend or family",
    "Doctor or hospital",
    "Drove by",
    "Other",
];

pub const TOUR_TIMES: &[&str] = &["Morning", "Afternoon", "Evening"];
