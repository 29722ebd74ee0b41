//! English / Hindi UI strings

use serde::{Deserialize, Serialize};

/// Active UI language (`language` query parameter / request field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Hindi,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Hindi => "hindi",
        }
    }

    /// Parse a query value; anything unrecognised falls back to English
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::to_ascii_lowercase).as_deref() {
            Some("hindi") => Self::Hindi,
            _ => Self::English,
        }
    }

    pub fn toggle(&self) -> Self {
        match self {
            Self::English => Self::Hindi,
            Self::Hindi => Self::English,
        }
    }

    /// Name of the language a toggle switches to
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Self::English => "हिंदी",
            Self::Hindi => "English",
        }
    }

    pub fn t(&self, text: Text) -> &'static str {
        text.get(*self)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Translatable UI string keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Text {
    // Soil report page
    PageTitle,
    PageDescription,
    UploadTitle,
    UploadInstructions,
    UploadTab,
    CameraTab,
    UploadHint,
    Capture,
    SwitchCamera,
    Retake,
    Process,
    Processing,
    PleaseWait,
    ResultTitle,
    SoilParamsTitle,
    LocationInfoTitle,
    PhLabel,
    EcLabel,
    OcLabel,
    NitrogenLabel,
    PhosphorusLabel,
    PotassiumLabel,
    ZincLabel,
    CopperLabel,
    IronLabel,
    ManganeseLabel,
    SulphurLabel,
    DistrictLabel,
    StateLabel,
    RecommendedCrops,
    FertilizerRecommendation,
    NoFertilizerRecommendation,
    NewAnalysis,
    ViewFertilizerReport,
    LocationModalTitle,
    LocationModalDesc,
    Submit,
    VarietiesNote,
    // Validation
    EnterDistrict,
    EnterState,
    SelectReportFirst,
    FileTooLarge,
    SelectImage,
    NoChatSession,
    EmptyMessage,
    CameraDenied,
    SoilProcessFailed,
    // Chat
    Welcome,
    ChatErrorPrefix,
    CreateChatFailed,
    DeleteChatFailed,
    ConfirmDeleteChat,
    SessionProblem,
    VoiceFailed,
    ImageFailed,
    RecordIdle,
    Recording,
    ProcessingAudio,
    MicrophoneError,
    AudioError,
    ImageUploaded,
    TextTab,
    VoiceTab,
    ImageTab,
    TypeMessage,
    Send,
    NewChat,
    CreatingChat,
    ChatHistoryTitle,
    ReadAloud,
    AnalyzeImage,
    // Mandi dashboard
    LoadingData,
    AllCommodities,
    AllMarkets,
    ApplyFilters,
    ErrorTitle,
}

impl Text {
    pub fn get(&self, lang: Language) -> &'static str {
        let (en, hi) = self.pair();
        match lang {
            Language::English => en,
            Language::Hindi => hi,
        }
    }

    fn pair(&self) -> (&'static str, &'static str) {
        match self {
            Self::PageTitle => ("Soil Report Analysis", "मिट्टी रिपोर्ट विश्लेषण"),
            Self::PageDescription => (
                "Upload your soil report to get personalized crop and fertilizer recommendations based on your soil parameters.",
                "अपनी मिट्टी के परैमीटर के आधार पर अनुकूलित फसल और उर्वरक सिफारिशें प्राप्त करने के लिए अपनी मिट्टी की रिपोर्ट अपलोड करें।",
            ),
            Self::UploadTitle => ("Upload Soil Report", "मिट्टी रिपोर्ट अपलोड करें"),
            Self::UploadInstructions => (
                "Please upload your soil test report or take a picture to analyze.",
                "कृपया विश्लेषण के लिए अपनी मिट्टी परीक्षण रिपोर्ट अपलोड करें या तस्वीर लें।",
            ),
            Self::UploadTab => ("Upload Report", "रिपोर्ट अपलोड करें"),
            Self::CameraTab => ("Take Picture", "तस्वीर लें"),
            Self::UploadHint => (
                "Drag and drop your soil report or click to browse",
                "अपनी मिट्टी की रिपोर्ट खींचें और छोड़ें या ब्राउज़ करने के लिए क्लिक करें",
            ),
            Self::Capture => ("Capture", "कैप्चर करें"),
            Self::SwitchCamera => ("Switch Camera", "कैमरा बदलें"),
            Self::Retake => ("Retake", "फिर से लें"),
            Self::Process => ("Process Soil Report", "मिट्टी रिपोर्ट संसाधित करें"),
            Self::Processing => ("Processing your soil report...", "आपकी मिट्टी रिपोर्ट संसाधित हो रही है..."),
            Self::PleaseWait => (
                "Please wait, this may take a moment.",
                "कृपया प्रतीक्षा करें, इसमें कुछ समय लग सकता है।",
            ),
            Self::ResultTitle => ("Soil Analysis Results", "मिट्टी विश्लेषण परिणाम"),
            Self::SoilParamsTitle => ("Soil Parameters", "मिट्टी के पैरामीटर"),
            Self::LocationInfoTitle => ("Location Information", "स्थान जानकारी"),
            Self::PhLabel => ("pH Level", "पीएच स्तर"),
            Self::EcLabel => ("EC", "ईसी"),
            Self::OcLabel => ("Organic Carbon", "जैविक कार्बन"),
            Self::NitrogenLabel => ("Nitrogen", "नाइट्रोजन"),
            Self::PhosphorusLabel => ("Phosphorus", "फॉस्फोरस"),
            Self::PotassiumLabel => ("Potassium", "पोटैशियम"),
            Self::ZincLabel => ("Zinc", "जिंक"),
            Self::CopperLabel => ("Copper", "कॉपर"),
            Self::IronLabel => ("Iron", "आयरन"),
            Self::ManganeseLabel => ("Manganese", "मैंगनीज"),
            Self::SulphurLabel => ("Sulphur", "सल्फर"),
            Self::DistrictLabel => ("District", "जिला"),
            Self::StateLabel => ("State", "राज्य"),
            Self::RecommendedCrops => ("Recommended Crops", "अनुशंसित फसलें"),
            Self::FertilizerRecommendation => ("Fertilizer Recommendations", "उर्वरक अनुशंसाएँ"),
            Self::NoFertilizerRecommendation => ("No specific recommendations", "कोई विशेष अनुशंसा नहीं"),
            Self::NewAnalysis => ("New Analysis", "नया विश्लेषण"),
            Self::ViewFertilizerReport => ("View Detailed Fertilizer Report", "विस्तृत उर्वरक रिपोर्ट देखें"),
            Self::LocationModalTitle => ("Location Information Required", "स्थान की जानकारी आवश्यक है"),
            Self::LocationModalDesc => (
                "Please provide the missing location information to continue:",
                "जारी रखने के लिए कृपया अनुपलब्ध स्थान की जानकारी प्रदान करें:",
            ),
            Self::Submit => ("Submit", "जमा करें"),
            Self::VarietiesNote => (
                "The crop varieties above are recommended for your region. Contact your local agriculture department for more information.",
                "उपरोक्त फसल किस्मों की जानकारी आपके क्षेत्र के लिए अनुशंसित है। अधिक जानकारी के लिए स्थानीय कृषि विभाग से संपर्क करें।",
            ),
            Self::EnterDistrict => ("Please enter a district name.", "कृपया जिले का नाम दर्ज करें।"),
            Self::EnterState => ("Please enter a state name.", "कृपया राज्य का नाम दर्ज करें।"),
            Self::SelectReportFirst => (
                "Please upload a soil report or take a picture first.",
                "कृपया पहले मिट्टी रिपोर्ट अपलोड करें या तस्वीर लें।",
            ),
            Self::FileTooLarge => (
                "The file is too large. Please upload a file smaller than 10MB.",
                "फ़ाइल बहुत बड़ी है। कृपया 10MB से छोटी फ़ाइल अपलोड करें।",
            ),
            Self::SelectImage => ("Please select an image file", "कृपया एक छवि फ़ाइल चुनें"),
            Self::NoChatSession => ("No active chat session", "कोई सक्रिय चैट सत्र नहीं"),
            Self::EmptyMessage => ("Please type a message", "कृपया एक संदेश लिखें"),
            Self::CameraDenied => (
                "Camera access denied or not available. Please grant permission or use file upload instead.",
                "कैमरा एक्सेस अस्वीकृत या उपलब्ध नहीं है। कृपया अनुमति दें या फ़ाइल अपलोड का उपयोग करें।",
            ),
            Self::SoilProcessFailed => (
                "Error processing soil report. Please try again.",
                "मिट्टी रिपोर्ट संसाधित करने में त्रुटि। कृपया पुनः प्रयास करें।",
            ),
            Self::Welcome => (
                "Hello! I'm your Green Sathi. How can I help you with your farming questions today?",
                "नमस्ते! मैं आपका ग्रीन साथी हूँ। आज मैं आपकी खेती संबंधित प्रश्नों में कैसे मदद कर सकता हूँ?",
            ),
            Self::ChatErrorPrefix => ("I'm sorry, I encountered an error: ", "मुझे खेद है, मुझे एक त्रुटि मिली: "),
            Self::CreateChatFailed => (
                "Failed to create new chat. Please try again.",
                "नया चैट बनाने में विफल। कृपया पुनः प्रयास करें।",
            ),
            Self::DeleteChatFailed => (
                "Failed to delete chat. Please try again.",
                "चैट हटाने में विफल। कृपया पुनः प्रयास करें।",
            ),
            Self::ConfirmDeleteChat => (
                "Are you sure you want to delete this chat?",
                "क्या आप वाकई इस चैट को हटाना चाहते हैं?",
            ),
            Self::SessionProblem => (
                "There seems to be an issue with your chat session. Would you like to start a new chat?",
                "आपके चैट सत्र में समस्या लगती है। क्या आप नया चैट शुरू करना चाहेंगे?",
            ),
            Self::VoiceFailed => (
                "Sorry, there was an error processing your voice. Please try again.",
                "क्षमा करें, आपकी आवाज़ संसाधित करने में त्रुटि हुई। कृपया पुनः प्रयास करें।",
            ),
            Self::ImageFailed => (
                "Sorry, there was an error analyzing your image. Please try again.",
                "क्षमा करें, आपकी छवि का विश्लेषण करने में त्रुटि हुई। कृपया पुनः प्रयास करें।",
            ),
            Self::RecordIdle => ("Press to start recording", "रिकॉर्डिंग शुरू करने के लिए दबाएँ"),
            Self::Recording => ("Recording... Click to stop", "रिकॉर्डिंग... रोकने के लिए क्लिक करें"),
            Self::ProcessingAudio => ("Processing audio...", "ऑडियो संसाधित हो रहा है..."),
            Self::MicrophoneError => ("Error accessing microphone", "माइक्रोफ़ोन एक्सेस करने में त्रुटि"),
            Self::AudioError => ("Error processing audio", "ऑडियो संसाधित करने में त्रुटि"),
            Self::ImageUploaded => ("Plant image uploaded for diagnosis", "निदान के लिए पौधे की छवि अपलोड की गई"),
            Self::TextTab => ("Text", "टेक्स्ट"),
            Self::VoiceTab => ("Voice", "आवाज़"),
            Self::ImageTab => ("Image", "छवि"),
            Self::TypeMessage => ("Type your message...", "अपना संदेश लिखें..."),
            Self::Send => ("Send", "भेजें"),
            Self::NewChat => ("New Chat", "नया चैट"),
            Self::CreatingChat => ("Creating...", "बना रहे हैं..."),
            Self::ChatHistoryTitle => ("Chat History", "चैट इतिहास"),
            Self::ReadAloud => ("Read result aloud", "परिणाम पढ़कर सुनाएँ"),
            Self::AnalyzeImage => ("Analyze Plant", "पौधे का विश्लेषण करें"),
            Self::LoadingData => ("Loading data...", "डेटा लोड हो रहा है..."),
            Self::AllCommodities => ("Available Commodities", "उपलब्ध वस्तुएँ"),
            Self::AllMarkets => ("All Nearest Markets", "सभी नज़दीकी मंडियाँ"),
            Self::ApplyFilters => ("Apply Filters", "फ़िल्टर लागू करें"),
            Self::ErrorTitle => ("Error!", "त्रुटि!"),
        }
    }
}
