//! # Dados de Demonstração
//!
//! Documentos CG3 em irlandês, léxicos semânticos reduzidos e uma tabela de
//! frequência de lemas, usados pelos testes e pela interface web.
//!
//! Os léxicos cobrem apenas o vocabulário dos documentos de demonstração; um
//! léxico completo é carregado de arquivo via [`crate::config::PipelineConfig`].

use crate::lemmafreq::LemmaFrequency;
use crate::lexicon::LexiconTagger;

/// Duas frases analisadas, com uma leitura ambígua em "scrúduithe".
pub const CG3_SAMPLE: &str = r#""<Níl>"
	"bí" Verb VI PresInd Neg @FMV #1->0
"<aon>"
	"aon" Det Qty Idf @>N #2->3
"<scrúduithe>"
	"scrúdú" Noun Masc Com Pl Len @SUBJ #3->1
	"bí" Verb VI PresInd Neg @FMV #1->0
"<móra>"
	"mór" Adj Com NotSlen Pl @N< #4->3
"<agam>"
	"ag" Pron Prep 1P Sg @PP_HAS #5->1
"<.>"
	"." Punct Fin #6->6

"<Bhuail>"
	"buail" Verb VTI PastInd Len @FMV #1->0
"<mé>"
	"mé" Pron Pers 1P Sg @NP #2->2
"<leis>"
	"le" Prep Simp DefArt @PP_ADVL #3->1
"<an>"
	"an" Art Sg Def @>N #4->5
"<léachtóir>"
	"léachtóir" Noun Masc Com Sg Ecl @P< #5->3
"<inné>"
	"inné" Adj Base @ADVL #6->6
"<.>"
	"." Punct Fin #7->7
"#;

/// Frase com expressão multipalavra, nome de lugar e ano.
pub const CG3_EASTER_RISING: &str = r#""<Tharla>"
	"tarlaigh" Verb VI PastInd Len @FMV #1->0
"<an>"
	"an" Art Sg Def @>N #2->3
"<tEirí>"
	"éirí" Noun Masc Com Sg Verbal @SUBJ #3->1
"<Amach>"
	"amach" Adv Dir @ADVL #4->3
"<i>"
	"i" Prep Simp @ADVL #5->1
"<mBaile>"
	"Baile" Noun Prop Masc Com Sg Ecl @P< #6->5
"<Átha>"
	"Átha" Noun Prop Masc Gen Sg @N< #7->6
"<Cliath>"
	"Cliath" Noun Prop Masc Gen Sg Place @N< #8->7
"<sa>"
	"i" Prep Art Sg Def @ADVL #9->1
"<bhliain>"
	"bliain" Noun Fem Com Sg Len @P< #10->9
"<1916>"
	"1916" Num Card @N< #11->10
"<.>"
	"." Punct Fin #12->12
"#;

/// Frase com nomes de pessoa e um verbo ambíguo.
pub const CG3_NAMES: &str = r#""<Chonaic>"
	"feic" Verb VT PastInd Len @FMV #1->0
"<Seán>"
	"Seán" Noun Prop Masc Com Sg PName @SUBJ #2->1
"<Ó>"
	"Ó" Noun Prop Masc Com Sg Fam @N< #3->2
"<Néill>"
	"Niall" Noun Prop Masc Gen Sg Fam @N< #4->3
"<an>"
	"an" Art Sg Def @>N #5->6
"<scoil>"
	"scoil" Noun Fem Com Sg @OBJ #6->1
"<agus>"
	"agus" Conj Coord @CC #7->1
"<an>"
	"an" Art Sg Def @>N #8->9
"<múinteoir>"
	"múinteoir" Noun Masc Com Sg @OBJ #9->7
"<.>"
	"." Punct Fin #10->10
"#;

/// Léxico de palavras simples: (lema, PAROLE curto, candidatos).
pub const DEMO_SW_LEXICON: &[(&str, &str, &str)] = &[
    ("bí", "Vm", "Z5 A3+"),
    ("scrúdú", "Nc", "X2.4"),
    ("mór", "Aq", "N3.2 A5.1+"),
    ("buail", "Vm", "A1.1.2"),
    ("léachtóir", "Nc", "P1"),
    ("inné", "Rt", "T1.1.1"),
    ("rith", "Vm", "M1"),
    ("tarlaigh", "Vm", "A2.1+"),
    ("éirí", "Nv", "M1 G1.2"),
    ("bliain", "Nc", "T1.3"),
    ("feic", "Vm", "X3.4 X2.5+"),
    ("scoil", "Nc", "P1/H1 S5c+"),
    ("múinteoir", "Nc", "P1/S2mf"),
    ("agus", "Cc", "Z5"),
    ("ceathrú", "Nc", "N5 T1.3"),
];

/// Léxico multipalavra: (modelo, candidatos).
pub const DEMO_MW_LEXICON: &[(&str, &str)] = &[
    ("ainm_Nc cleite_Nc", "Q2.2"),
    ("Baile_Np Átha_Np Cliath_Np", "Z2"),
    ("éirí_Nv amach_R", "G2.1-"),
    ("tar_* éis_*", "Z5"),
];

/// Frequência de lemas dos documentos de demonstração.
pub const DEMO_LEMMA_FREQUENCY: &[(&str, u64)] = &[
    ("agus", 98_000),
    ("bí", 75_000),
    ("an", 60_000),
    ("i", 41_000),
    ("le", 22_000),
    ("ag", 21_000),
    ("mór", 3_100),
    ("feic", 2_900),
    ("bliain", 2_500),
    ("scoil", 900),
    ("scrúdú", 120),
    ("ciallaigh", 12),
];

/// Etiquetador com os léxicos de demonstração.
pub fn demo_tagger() -> LexiconTagger {
    let mut tagger = LexiconTagger::new();
    for (lemma, pos, tags) in DEMO_SW_LEXICON {
        tagger.add_single(lemma, pos, tags);
    }
    for (template, tags) in DEMO_MW_LEXICON {
        tagger.add_mwe(template, tags);
    }
    tagger
}

pub fn demo_lemma_frequency() -> LemmaFrequency {
    LemmaFrequency::from_pairs(DEMO_LEMMA_FREQUENCY.iter().copied())
}

/// Documentos de demonstração (título, CG3) para a interface web.
pub fn demo_documents() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Scrúduithe", CG3_SAMPLE),
        ("Éirí Amach", CG3_EASTER_RISING),
        ("Ainmneacha", CG3_NAMES),
    ]
}

/// Teste de acurácia em TSV, com a coluna de tags esperadas.
pub const ACCURACY_TSV: &str = "TOKEN\tLEMMA\tPAROLE\tEXPECTED_USAS
Níl\tbí\tVmip---n\tA3+
aon\taon\tDq\tZ5
scrúduithe\tscrúdú\tNcmpc\tX2.4
móra\tmór\tAqp-pc\tN3.2
agam\tag\tPr1-s\tZ8
.\t.\tFe\tZ9
";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cg3::Cg3Document;
    use crate::usas::MultiSenseTag;

    #[test]
    fn test_demo_documents_parse() {
        for (title, cg3) in demo_documents() {
            let doc = Cg3Document::parse(cg3).unwrap();
            assert!(!doc.is_empty(), "{title}");
        }
    }

    #[test]
    fn test_demo_lexicon_tags_are_valid() {
        for (_, _, tags) in DEMO_SW_LEXICON {
            assert!(MultiSenseTag::parse(tags).is_ok(), "{tags}");
        }
        for (_, tags) in DEMO_MW_LEXICON {
            assert!(MultiSenseTag::parse(tags).is_ok(), "{tags}");
        }
    }

    #[test]
    fn test_demo_frequency() {
        let freqs = demo_lemma_frequency();
        assert!(freqs.get("agus") > freqs.get("ciallaigh"));
        assert!(freqs.get("bí") > freqs.get("scrúdú"));
    }
}
