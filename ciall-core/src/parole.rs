//! # Compilador de Tags Morfológicas → PAROLE
//!
//! Converte o conjunto de traços morfológicos de um token (ex: `Verb VI PresInd Neg`)
//! em um código posicional PAROLE de largura fixa, sua forma curta e a classe
//! gramatical universal (UD).
//!
//! ## Código Posicional
//!
//! O código é montado em um buffer de 9 posições preenchido com `-`. A posição 0
//! é a classe principal; as demais dependem da classe (modo, tempo, pessoa,
//! número, caso, gênero, contraste, dependência...). Ao final os `-` à direita
//! são removidos:
//!
//! ```text
//!  Verb VI PresInd Neg   →   V m i p - - - n -   →   "Vmip---n"
//!                            0 1 2 3 4 5 6 7 8
//! ```
//!
//! ## Ordem das Regras
//!
//! As classes principais são testadas em ordem fixa de prioridade e **apenas a
//! primeira** que casa é aplicada ([`RULES`]). A ordem importa: `Prep` vem
//! depois de `Pron` (pronomes preposicionais usam `Prep`) e `Art` vem depois
//! de `Prep` (preposições com artigo usam `Art`).
//!
//! A função é total: qualquer conjunto de traços produz um código, e
//! combinações desconhecidas caem na regra final `Xx` (desconhecido).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::trace;

/// Número de posições do código PAROLE longo.
const WIDTH: usize = 9;
const FILLER: char = '-';

/// Resultado da compilação: código longo, código curto e classe UD.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parole {
    pub long: String,
    pub short: String,
    pub udep: String,
}

/// Conjunto de traços morfológicos de um token.
struct Features<'a>(HashSet<&'a str>);

impl<'a> Features<'a> {
    fn has(&self, feature: &str) -> bool {
        self.0.contains(feature)
    }

    fn has_any(&self, features: &[&str]) -> bool {
        features.iter().any(|f| self.has(f))
    }
}

/// Buffer posicional de 9 caracteres.
struct Slots([char; WIDTH]);

impl Slots {
    fn new() -> Self {
        Slots([FILLER; WIDTH])
    }

    fn set(&mut self, slot: usize, value: char) {
        self.0[slot] = value;
    }

    /// Atribui o valor do primeiro traço presente (cadeia `if / else if`).
    fn pick(&mut self, features: &Features, slot: usize, options: &[(&str, char)]) {
        if let Some((_, value)) = options.iter().find(|(f, _)| features.has(f)) {
            self.set(slot, *value);
        }
    }

    /// Como [`Slots::pick`], mas cada opção pode escrever várias posições.
    fn pick_multi(&mut self, features: &Features, options: &[(&str, &[(usize, char)])]) {
        if let Some((_, writes)) = options.iter().find(|(f, _)| features.has(f)) {
            for (slot, value) in writes.iter() {
                self.set(*slot, *value);
            }
        }
    }

    fn to_long(&self) -> String {
        let code: String = self.0.iter().collect();
        code.trim_end_matches(FILLER).to_string()
    }
}

/// Uma regra da tabela de decisão: classe principal, condição e construtor.
struct Rule {
    name: &'static str,
    applies: fn(&Features) -> bool,
    build: fn(&Features, &mut Slots),
}

/// Tabela de decisão, em ordem de prioridade.
const RULES: &[Rule] = &[
    Rule { name: "guess", applies: is_guess, build: build_unknown },
    Rule { name: "foreign", applies: is_foreign, build: build_foreign },
    Rule { name: "noun", applies: is_noun, build: build_noun },
    Rule { name: "verb", applies: is_verb, build: build_verb },
    Rule { name: "adjective", applies: is_adjective, build: build_adjective },
    Rule { name: "pronoun", applies: is_pronoun, build: build_pronoun },
    Rule { name: "determiner", applies: is_determiner, build: build_determiner },
    Rule { name: "copula", applies: is_copula, build: build_copula },
    Rule { name: "adverb", applies: is_adverb, build: build_adverb },
    Rule { name: "preposition", applies: is_preposition, build: build_preposition },
    Rule { name: "article", applies: is_article, build: build_article },
    Rule { name: "conjunction", applies: is_conjunction, build: build_conjunction },
    Rule { name: "numeral", applies: is_numeral, build: build_numeral },
    Rule { name: "interjection", applies: is_interjection, build: |_, s| s.set(0, 'I') },
    Rule { name: "verbal_particle", applies: is_verbal_particle, build: build_verbal_particle },
    Rule { name: "particle", applies: is_particle, build: build_particle },
    Rule { name: "punctuation", applies: is_punctuation, build: build_punctuation },
    Rule { name: "abbreviation", applies: is_abbreviation, build: |_, s| s.set(0, 'Y') },
    Rule { name: "list_item", applies: |f| f.has("Item"), build: |_, s| residual(s, "l") },
    Rule { name: "email", applies: |f| f.has("Email"), build: |_, s| residual(s, "e") },
    Rule { name: "web", applies: |f| f.has("Web"), build: |_, s| residual(s, "w") },
    Rule { name: "filler", applies: |f| f.has("Filler"), build: |_, s| residual(s, "sf") },
    Rule {
        name: "english_communicator",
        applies: |f| f.has("Cmc") && f.has("English"),
        build: |_, s| residual(s, "lce"),
    },
    Rule { name: "event", applies: |f| f.has("Event"), build: |_, s| residual(s, "se") },
    Rule { name: "fragment", applies: |f| f.has("Fragment"), build: |_, s| residual(s, "sp") },
    Rule { name: "indecipherable", applies: |f| f.has("Xxx"), build: |_, s| residual(s, "sx") },
    Rule { name: "unknown", applies: |f| f.has("?"), build: build_unknown },
];

/// Converte traços morfológicos em (PAROLE longo, PAROLE curto, classe UD).
///
/// # Exemplo
/// ```rust
/// use ciall_core::parole::pos_to_parole;
///
/// let parole = pos_to_parole(&["Verb", "VI", "PresInd", "Neg"]);
/// assert_eq!(parole.long, "Vmip---n");
/// assert_eq!(parole.short, "Vm");
/// assert_eq!(parole.udep, "VERB");
/// ```
pub fn pos_to_parole<S: AsRef<str>>(features: &[S]) -> Parole {
    let features = Features(features.iter().map(|f| f.as_ref()).collect());
    let mut slots = Slots::new();

    match RULES.iter().find(|rule| (rule.applies)(&features)) {
        Some(rule) => {
            trace!(rule = rule.name, "regra PAROLE aplicada");
            (rule.build)(&features, &mut slots);
        }
        None => build_unknown(&features, &mut slots),
    }

    let long = slots.to_long();
    let short = shorten(&long);
    let udep = universal_pos(&long).to_string();
    Parole { long, short, udep }
}

/// Forma curta do código PAROLE.
///
/// - Nomes, verbos, adjetivos, pronomes, determinantes, artigos, adposições,
///   numerais, classe única e outros → 2 primeiros caracteres.
/// - Advérbios, conjunções, interjeições, pontuação, abreviações, cópula e
///   partículas → 1º caractere.
/// - Qualquer outra letra inicial passa inalterada.
pub fn shorten(long: &str) -> String {
    match long.chars().next() {
        Some('N' | 'V' | 'A' | 'P' | 'D' | 'T' | 'S' | 'M' | 'U' | 'X') => {
            long.chars().take(2).collect::<String>().trim_end_matches(FILLER).to_string()
        }
        Some('R' | 'C' | 'I' | 'F' | 'Y' | 'W' | 'Q') => long.chars().take(1).collect(),
        _ => long.to_string(),
    }
}

/// Classe gramatical universal (UD) a partir da letra inicial do código PAROLE.
pub fn universal_pos(long: &str) -> &'static str {
    match long.chars().next() {
        Some('N') => "NOUN",
        Some('V') => "VERB",
        Some('A') => "ADJ",
        Some('P') => "PRON",
        Some('D' | 'T') => "DET",
        Some('S') => "ADP",
        Some('M') => "NUM",
        Some('R') => "ADV",
        Some('C') => "CCONJ",
        Some('I') => "INTJ",
        Some('F') => "PUNCT",
        Some('W') => "AUX",
        Some('Q') => "PART",
        _ => "X",
    }
}

// === Condições ===

fn is_guess(f: &Features) -> bool {
    f.has_any(&["Guess", "GuessCmpd"])
}

fn is_foreign(f: &Features) -> bool {
    f.has("Foreign")
}

fn is_noun(f: &Features) -> bool {
    f.has("Noun")
}

fn is_verb(f: &Features) -> bool {
    f.has("Verb")
}

fn is_adjective(f: &Features) -> bool {
    f.has("Adj")
}

fn is_pronoun(f: &Features) -> bool {
    f.has("Pron")
}

fn is_determiner(f: &Features) -> bool {
    f.has("Det")
}

fn is_copula(f: &Features) -> bool {
    f.has("Cop")
}

fn is_adverb(f: &Features) -> bool {
    f.has("Adv")
}

fn is_preposition(f: &Features) -> bool {
    f.has("Prep")
}

fn is_article(f: &Features) -> bool {
    f.has("Art")
}

fn is_conjunction(f: &Features) -> bool {
    f.has("Conj")
}

fn is_numeral(f: &Features) -> bool {
    f.has("Num")
}

fn is_interjection(f: &Features) -> bool {
    f.has("Itj")
}

fn is_verbal_particle(f: &Features) -> bool {
    f.has("Part") && f.has("Vb")
}

fn is_particle(f: &Features) -> bool {
    f.has("Part") && !f.has("Vb")
}

fn is_punctuation(f: &Features) -> bool {
    f.has("Punct")
}

fn is_abbreviation(f: &Features) -> bool {
    f.has("Abr")
}

// === Construtores ===

const PERSON: &[(&str, char)] = &[("1P", '1'), ("2P", '2'), ("3P", '3')];
const GENDER: &[(&str, char)] = &[("Masc", 'm'), ("Fem", 'f')];
const NUMBER: &[(&str, char)] = &[("Sg", 's'), ("Pl", 'p')];

fn residual(s: &mut Slots, rest: &str) {
    s.set(0, 'X');
    for (i, c) in rest.chars().enumerate() {
        s.set(i + 1, c);
    }
}

fn build_unknown(_: &Features, s: &mut Slots) {
    residual(s, "x");
}

fn build_foreign(f: &Features, s: &mut Slots) {
    residual(s, "f");

    if f.has("English") {
        s.set(2, 'e');
        s.pick(
            f,
            3,
            &[
                ("Noun", 'n'),
                ("Verb", 'v'),
                ("Adj", 'a'),
                ("Pron", 'p'),
                ("Det", 'd'),
                ("Adv", 'r'),
                ("Prep", 's'),
                ("Conj", 'c'),
                ("Num", 'm'),
            ],
        );
        // Nome próprio inglês, possivelmente definido (ex: "The Bahamas")
        if f.has("Noun") && f.has("Prop") {
            s.set(4, 'p');
            if f.has("Def") {
                s.set(5, 'd');
            }
        }
    }

    if f.has("Latin") {
        s.set(2, 'l');
    }
}

fn build_noun(f: &Features, s: &mut Slots) {
    s.set(0, 'N');
    s.set(1, 'c');
    s.pick(f, 1, &[("Verbal", 'v'), ("Prop", 'p'), ("Subst", 's')]);
    s.pick(f, 2, GENDER);
    s.pick(f, 3, NUMBER);
    s.pick(f, 4, &[("Com", 'c'), ("Gen", 'g'), ("Voc", 'v'), ("Dat", 'd')]);
    s.pick(f, 6, &[("Emph", 'e')]);
    s.pick(f, 7, &[("NStem", 'n')]);
}

fn build_verb(f: &Features, s: &mut Slots) {
    s.set(0, 'V');
    s.set(1, 'm');
    s.pick(f, 2, &[("Ind", 'i'), ("Subj", 's'), ("Imper", 'm'), ("Cond", 'c')]);
    // Tempo; as formas combinadas também fixam o modo
    s.pick_multi(
        f,
        &[
            ("Pres", &[(3, 'p')]),
            ("Past", &[(3, 's')]),
            ("Fut", &[(3, 'f')]),
            ("PastImp", &[(2, 'i'), (3, 'h')]),
            ("FutInd", &[(2, 'i'), (3, 'f')]),
            ("PresImp", &[(2, 'i'), (3, 'g')]),
            ("PastInd", &[(2, 'i'), (3, 's')]),
            ("PastIndDep", &[(2, 'i'), (3, 's'), (7, 'd')]),
            ("PresInd", &[(2, 'i'), (3, 'p')]),
            ("PresSubj", &[(2, 's'), (3, 'p')]),
            ("PastSubj", &[(2, 's'), (3, 's')]),
            ("Imper", &[(2, 'm'), (3, 'p')]),
        ],
    );
    s.pick(f, 4, &[("1P", '1'), ("2P", '2'), ("3P", '3'), ("Auto", '0')]);
    s.pick(f, 5, NUMBER);
    s.pick(f, 7, &[("Dep", 'd'), ("Rel", 'r'), ("Neg", 'n')]);
    s.pick(f, 8, &[("Emph", 'e')]);
}

fn build_adjective(f: &Features, s: &mut Slots) {
    s.set(0, 'A');
    s.set(1, if f.has("Verbal") { 'v' } else { 'q' });
    s.set(2, if f.has("Comp") { 'c' } else { 'p' });
    s.pick(f, 3, GENDER);
    s.pick(f, 4, NUMBER);
    s.pick(f, 5, &[("Com", 'c'), ("Gen", 'g'), ("Voc", 'v')]);
    s.pick(f, 6, &[("Emph", 'e')]);
}

fn build_pronoun(f: &Features, s: &mut Slots) {
    s.set(0, 'P');
    s.pick(
        f,
        1,
        &[("Pers", 'p'), ("Ref", 'x'), ("Idf", 'i'), ("Prep", 'r'), ("Dem", 'd'), ("Q", 'q')],
    );
    s.pick(f, 2, PERSON);
    s.pick(f, 3, GENDER);
    s.pick(f, 4, NUMBER);
    if f.has_any(&["VerbSubj", "Sbj"]) {
        s.set(5, 'n');
    }
    s.pick(f, 6, &[("Emph", 'e')]);
}

fn build_determiner(f: &Features, s: &mut Slots) {
    s.set(0, 'D');
    s.pick(f, 1, &[("Dem", 'd'), ("Poss", 'p'), ("Qty", 'q'), ("Q", 'w')]);
    s.pick(f, 2, PERSON);
    s.pick(f, 3, GENDER);
    s.pick(f, 4, NUMBER);
}

fn build_copula(f: &Features, s: &mut Slots) {
    s.set(0, 'W');
    s.pick_multi(
        f,
        &[
            ("Pres", &[(1, 'p'), (3, 'i')]),
            ("Past", &[(1, 's'), (3, 'i')]),
            ("Cond", &[(1, 's')]),
            ("PresSubj", &[(1, 'p'), (3, 's')]),
        ],
    );
    s.pick(f, 2, &[("Rel", 'r'), ("RelInd", 's'), ("Dep", 'd')]);
    s.pick(f, 5, &[("Pron", '3')]);
    // Negação e interrogação são independentes entre si
    if f.has("Neg") {
        s.set(4, 'n');
    }
    if f.has("NegQ") {
        s.set(4, 'n');
        s.set(3, 'q');
    }
    if f.has("Q") {
        s.set(3, 'q');
    }
}

fn build_adverb(f: &Features, s: &mut Slots) {
    s.set(0, 'R');
    s.pick(
        f,
        1,
        &[("Gn", 'g'), ("Its", 'i'), ("Q", 'q'), ("Temp", 't'), ("Dir", 'd'), ("Loc", 'l')],
    );
}

fn build_preposition(f: &Features, s: &mut Slots) {
    s.set(0, 'S');
    s.set(1, 'p');
    s.pick(
        f,
        2,
        &[("Cmpd", 'c'), ("Art", 'a'), ("Deg", 'd'), ("Poss", 'p'), ("Rel", 'r'), ("Obj", 'o')],
    );
    if f.has("Sg") {
        s.set(4, 's');
    }
    if f.has("Pl") {
        s.set(4, 'p');
    }
}

fn build_article(f: &Features, s: &mut Slots) {
    s.set(0, 'T');
    s.set(1, 'd');
    s.pick(f, 2, GENDER);
    s.pick(f, 3, NUMBER);
    s.pick(f, 4, &[("Gen", 'g')]);
}

fn build_conjunction(f: &Features, s: &mut Slots) {
    s.set(0, 'C');
    s.pick(f, 1, &[("Coord", 'c'), ("Subord", 's')]);
    s.pick(f, 2, &[("Cop", 'w')]);
    s.pick(f, 3, &[("Past", 's')]);
}

fn build_numeral(f: &Features, s: &mut Slots) {
    s.set(0, 'M');
    s.pick(
        f,
        1,
        &[("Card", 'c'), ("Ord", 'o'), ("Pers", 'p'), ("Dig", 'n'), ("Rom", 'r'), ("Op", 's')],
    );
}

fn build_verbal_particle(f: &Features, s: &mut Slots) {
    s.set(0, 'Q');

    if f.has("NegQ") || (f.has("Neg") && f.has("Q")) {
        s.set(1, 'n');
        s.set(2, 'q');
    } else if f.has("Neg") {
        s.set(1, 'n');
    } else if f.has("Q") {
        s.set(1, 'q');
    }

    if f.has("Subj") {
        s.set(2, 's');
    } else if f.has("Imp") {
        s.set(2, 'm');
    } else if f.has_any(&["Rel", "Direct"]) {
        s.set(2, 'r');
    } else if f.has("Indirect") {
        s.set(2, 'i');
    } else if f.has("Pro") {
        s.set(2, 'p');
    }

    if f.has_any(&["Past", "PastIrreg"]) {
        s.set(3, 's');
    }
}

fn build_particle(f: &Features, s: &mut Slots) {
    s.set(0, 'U');
    s.pick(
        f,
        1,
        &[
            ("Cp", 'w'),
            ("Ad", 'a'),
            ("Deg", 'd'),
            ("Voc", 'v'),
            ("Nm", 'm'),
            ("Comp", 'c'),
            ("Pat", 'p'),
        ],
    );
}

fn build_punctuation(f: &Features, s: &mut Slots) {
    s.set(0, 'F');
    s.pick(
        f,
        1,
        &[("Fin", 'e'), ("Int", 'i'), ("Quo", 'a'), ("Bar", 'b'), ("Brack", 'p'), ("Curr", 'c')],
    );
    if f.has("Q") {
        s.set(1, 'q');
    }
}
