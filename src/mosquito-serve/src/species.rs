use std::fmt;

/// Classes the model was trained on, in the order of its output vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Species {
    AedesAegypti,
    AedesAlbopictus,
    AnophelesAlbimanus,
    AnophelesArabiensis,
    AnophelesAtroparvus,
    AnophelesColuzzi,
    AnophelesFarauti,
    AnophelesFreeborni,
    AnophelesStephensi,
    CulexQuinquefasciatus,

    /// No confident match with any known species
    Unknown,
}

impl Species {
    pub const ALL: [Species; 11] = [
        Species::AedesAegypti,
        Species::AedesAlbopictus,
        Species::AnophelesAlbimanus,
        Species::AnophelesArabiensis,
        Species::AnophelesAtroparvus,
        Species::AnophelesColuzzi,
        Species::AnophelesFarauti,
        Species::AnophelesFreeborni,
        Species::AnophelesStephensi,
        Species::CulexQuinquefasciatus,
        Species::Unknown,
    ];

    /// Species for the given position of the model output
    pub fn from_index(index: usize) -> Option<Species> {
        Species::ALL.get(index).copied()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Species::AedesAegypti => "Aedes Aegypti",
            Species::AedesAlbopictus => "Aedes Albopictus",
            Species::AnophelesAlbimanus => "Anopheles Albimanus",
            Species::AnophelesArabiensis => "Anopheles Arabiensis",
            Species::AnophelesAtroparvus => "Anopheles Atroparvus",
            Species::AnophelesColuzzi => "Anopheles Coluzzi",
            Species::AnophelesFarauti => "Anopheles Farauti",
            Species::AnophelesFreeborni => "Anopheles Freeborni",
            Species::AnophelesStephensi => "Anopheles Stephensi",
            Species::CulexQuinquefasciatus => "Culex Quinquefasciatus",
            Species::Unknown => "Unknown",
        }
    }

    /// Physical description of the species. `Unknown` has none.
    pub fn description(&self) -> Option<&'static str> {
        let text = match self {
            Species::AedesAegypti => {
                "Ciri fisik utama adalah corak belang (loreng) putih dan hitam pada kaki dan \
                 tubuhnya. Di bagian punggung (dorsal) terdapat pola khas berbentuk seperti alat \
                 musik lira (lyre) berwarna putih."
            }
            Species::AedesAlbopictus => {
                "Dikenal sebagai nyamuk macan, memiliki tubuh berwarna hitam dengan satu garis \
                 putih tebal dan jelas tepat di tengah punggungnya. Kakinya juga memiliki \
                 belang-belang putih, namun lebih sedikit dibanding Aedes aegypti."
            }
            Species::AnophelesAlbimanus => {
                "Memiliki tubuh berwarna gelap. Ciri khas utamanya adalah sisik putih pada bagian \
                 tarsus (segmen ujung) kaki belakangnya. Saat istirahat, posisi tubuhnya \
                 menungging khas nyamuk Anopheles."
            }
            Species::AnophelesArabiensis => {
                "Spesies ini sangat mirip dengan Anopheles gambiae dan Anopheles coluzzi. \
                 Identifikasi visual sulit dan seringkali membutuhkan analisis genetik atau \
                 morfologi detail. Umumnya berwarna coklat keabu-abuan dengan bintik-bintik samar \
                 di sayap."
            }
            Species::AnophelesAtroparvus => {
                "Nyamuk berukuran sedang dengan warna coklat kusam. Sayapnya memiliki \
                 bintik-bintik gelap yang tidak terlalu kontras. Sulit dibedakan secara visual \
                 dari Anopheles lain tanpa mikroskop."
            }
            Species::AnophelesColuzzi => {
                "Secara fisik hampir identik dengan Anopheles gambiae. Nyamuk ini berwarna coklat \
                 muda hingga abu-abu dengan bintik-bintik gelap yang tersebar di sayapnya. \
                 Identifikasi pasti memerlukan analisis genetik."
            }
            Species::AnophelesFarauti => {
                "Memiliki tubuh berwarna gelap. Sisik pada sayapnya membentuk pola bintik-bintik \
                 gelap dan pucat yang jelas. Ujung sayap (wing tip) seringkali memiliki pinggiran \
                 pucat."
            }
            Species::AnophelesFreeborni => {
                "Berwarna coklat keabu-abuan dengan bintik-bintik gelap pada sayapnya. Ciri \
                 khasnya adalah adanya kumpulan sisik gelap pada vena sayap tertentu. Betina \
                 memiliki palpi (organ dekat mulut) sepanjang proboscis (belalai)."
            }
            Species::AnophelesStephensi => {
                "Memiliki bintik-bintik pada tubuh dan kaki. Ciri khasnya adalah adanya belang \
                 putih dan hitam pada tarsus (ujung kaki) dan proboscis (belalai) yang \
                 berbintik."
            }
            Species::CulexQuinquefasciatus => {
                "Umumnya berwarna coklat muda tanpa pola atau corak yang mencolok pada tubuh dan \
                 kakinya. Saat istirahat, posisi tubuhnya sejajar dengan permukaan (tidak \
                 menungging). Abdomen (perut) memiliki ujung yang tumpul."
            }
            Species::Unknown => return None,
        };

        Some(text)
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
