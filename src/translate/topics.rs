/// Recurring accessibility themes with a canned, four-part explanation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Landmark,
    ListStructure,
    HeadingOrder,
    Contrast,
    LinkText,
    FormLabel,
    AltText,
}

/// Problem, impact, solution and example for one topic.
pub struct Explanation {
    pub title: &'static str,
    pub problem: &'static str,
    pub impact: &'static str,
    pub solution: &'static str,
    pub example: &'static str,
}

/// Heuristic order matters: the first topic with a matching keyword wins.
pub(crate) const TOPIC_KEYWORDS: &[(Topic, &[&str])] = &[
    (Topic::Landmark, &["main landmark"]),
    (Topic::ListStructure, &["list structure", "lists do not contain", "<li>"]),
    (Topic::HeadingOrder, &["heading order", "heading elements", "sequentially-descending"]),
    (Topic::Contrast, &["contrast ratio", "contrast"]),
    (Topic::LinkText, &["link text", "links do not have", "link name"]),
    (Topic::FormLabel, &["form elements", "associated labels", "form label"]),
    (Topic::AltText, &["alt attribute", "[alt]", "alternative text"]),
];

impl Topic {
    /// Find the first topic whose keyword appears in any of the given texts.
    pub fn detect(texts: &[&str]) -> Option<Topic> {
        let lowered: Vec<String> = texts.iter().map(|t| t.to_lowercase()).collect();
        TOPIC_KEYWORDS.iter().find_map(|(topic, keywords)| {
            keywords
                .iter()
                .any(|k| lowered.iter().any(|t| t.contains(k)))
                .then_some(*topic)
        })
    }

    pub fn explanation(&self) -> &'static Explanation {
        match self {
            Topic::Landmark => &LANDMARK,
            Topic::ListStructure => &LIST_STRUCTURE,
            Topic::HeadingOrder => &HEADING_ORDER,
            Topic::Contrast => &CONTRAST,
            Topic::LinkText => &LINK_TEXT,
            Topic::FormLabel => &FORM_LABEL,
            Topic::AltText => &ALT_TEXT,
        }
    }

    /// Render the remediation text shown to users.
    pub fn render_help(&self) -> String {
        let e = self.explanation();
        format!(
            "Problème : {}\nImpact : {}\nSolution : {}\nExemple : {}",
            e.problem, e.impact, e.solution, e.example
        )
    }
}

static LANDMARK: Explanation = Explanation {
    title: "Pas de balise <main> principale",
    problem: "La page ne contient pas de zone <main> identifiant le contenu principal.",
    impact: "Les lecteurs d'écran ne peuvent pas sauter directement au contenu et doivent parcourir toute la navigation.",
    solution: "Entourez le contenu principal d'une unique balise <main>.",
    example: "<main id=\"contenu\"> ... </main>",
};

static LIST_STRUCTURE: Explanation = Explanation {
    title: "Listes mal structurées",
    problem: "Des listes <ul> ou <ol> contiennent autre chose que des éléments <li>.",
    impact: "Les technologies d'assistance annoncent un nombre d'éléments erroné ou ne reconnaissent pas la liste.",
    solution: "Placez chaque entrée dans un <li> et déplacez les autres éléments hors de la liste.",
    example: "<ul><li>Accueil</li><li>Contact</li></ul>",
};

static HEADING_ORDER: Explanation = Explanation {
    title: "Titres dans le désordre (H1, H2, H3...)",
    problem: "Les niveaux de titres sautent des étapes, par exemple un H4 directement après un H2.",
    impact: "La structure du document devient incompréhensible pour les personnes qui naviguent par titres.",
    solution: "Respectez la hiérarchie : un H1, puis des H2, puis des H3 à l'intérieur des H2.",
    example: "<h1>Boutique</h1> <h2>Nouveautés</h2> <h3>Chaussures</h3>",
};

static CONTRAST: Explanation = Explanation {
    title: "Contraste des couleurs insuffisant",
    problem: "Le contraste entre le texte et l'arrière-plan est trop faible.",
    impact: "Les personnes malvoyantes ou daltoniennes ne parviennent pas à lire le texte.",
    solution: "Visez un ratio minimum de 4.5:1 pour le texte courant et 3:1 pour les grands textes.",
    example: "color: #595959 sur fond #ffffff (ratio 7:1) au lieu de #aaaaaa (ratio 2.3:1).",
};

static LINK_TEXT: Explanation = Explanation {
    title: "Liens sans texte descriptif",
    problem: "Certains liens n'ont aucun texte visible ou accessible.",
    impact: "Un lecteur d'écran annonce seulement \"lien\", sans indiquer la destination.",
    solution: "Ajoutez un texte explicite au lien ou un attribut aria-label sur les liens icône.",
    example: "<a href=\"/panier\" aria-label=\"Voir le panier\"><svg ...></svg></a>",
};

static FORM_LABEL: Explanation = Explanation {
    title: "Champs de formulaire sans labels",
    problem: "Des champs de formulaire n'ont pas de label associé.",
    impact: "Les utilisateurs de lecteurs d'écran ne savent pas quelle information saisir.",
    solution: "Associez chaque champ à un <label for=\"...\"> ou donnez-lui un aria-label.",
    example: "<label for=\"email\">Adresse e-mail</label> <input id=\"email\" type=\"email\">",
};

static ALT_TEXT: Explanation = Explanation {
    title: "Images sans attribut alt",
    problem: "Des images n'ont pas d'attribut alt décrivant leur contenu.",
    impact: "Le contenu des images est perdu pour les personnes aveugles et pour les moteurs de recherche.",
    solution: "Ajoutez un alt descriptif, ou alt=\"\" pour les images purement décoratives.",
    example: "<img src=\"logo.png\" alt=\"Logo de l'entreprise\">",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_each_topic() {
        assert_eq!(Topic::detect(&["Document does not have a main landmark."]), Some(Topic::Landmark));
        assert_eq!(Topic::detect(&["Lists do not contain only <li> elements"]), Some(Topic::ListStructure));
        assert_eq!(Topic::detect(&["Properly ordered headings... heading order"]), Some(Topic::HeadingOrder));
        assert_eq!(Topic::detect(&["Low-contrast text is difficult to read"]), Some(Topic::Contrast));
        assert_eq!(Topic::detect(&["Link text (and alternate text for images...)"]), Some(Topic::LinkText));
        assert_eq!(Topic::detect(&["Form elements do not have associated labels"]), Some(Topic::FormLabel));
        assert_eq!(Topic::detect(&["Image elements do not have [alt] attributes"]), Some(Topic::AltText));
    }

    #[test]
    fn test_detect_is_case_insensitive_and_checks_all_texts() {
        assert_eq!(Topic::detect(&["", "CONTRAST RATIO too low"]), Some(Topic::Contrast));
    }

    #[test]
    fn test_other_landmark_rules_not_reported_as_missing_main() {
        assert_eq!(Topic::detect(&["All page content should be contained by landmarks"]), None);
        assert_eq!(Topic::detect(&["Landmarks should have a unique role or role/label/title"]), None);
        assert_eq!(Topic::detect(&["Document should not have more than one banner landmark"]), None);
        assert_eq!(Topic::detect(&["Document should have one main landmark"]), Some(Topic::Landmark));
    }

    #[test]
    fn test_detect_nothing() {
        assert_eq!(Topic::detect(&["Buttons do not have an accessible name"]), None);
        assert_eq!(Topic::detect(&[]), None);
    }

    #[test]
    fn test_render_help_has_four_parts() {
        let help = Topic::Contrast.render_help();
        assert!(help.starts_with("Problème : "));
        assert!(help.contains("\nImpact : "));
        assert!(help.contains("\nSolution : "));
        assert!(help.contains("\nExemple : "));
        assert!(help.contains("4.5:1"));
    }
}
