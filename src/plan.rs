//! The project-plan document itself: the hardcoded payload, the
//! generator configuration, and the rendering sequence.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use log::info;

use crate::compose::{Align, Composer};
use crate::error::{Error, Result};
use crate::fonts::Font;

/// Title line, written once, centered and bold, before any body text.
pub const PLAN_TITLE: &str = "Churn Prediction and Retention System - Project Plan";

/// The plan body. Rendered one `\n`-delimited segment at a time, in
/// order; leading and trailing empty segments each consume one line
/// height like any other segment.
pub const PLAN_BODY: &str = r#"

### Project Roadmap
This project involves multiple stages: **data preprocessing, predictive modeling, NLP analysis, Generative AI for retention, system integration, deployment, and ethical considerations**. We will use **MySQL as a database, Google Colab for model development, and LangChain for chatbot integration**.

---

### Step-by-Step Plan

#### 1. Data Preparation & MySQL Setup
✅ Upload the dataset (`customer churn data_usecase2_Hackathon.xlsx`) to **MySQL**:
   - Convert the Excel sheet into a **structured relational database**.
   - Create a **table schema** matching the dataset features.
   - Use **SQLAlchemy** in Colab to fetch data from MySQL.

✅ **Understanding Dataset**:
   - Load data from MySQL into **Pandas DataFrame**.
   - Check **missing values, data types, and outliers**.
   - Identify **target variable** (`churned/not churned`).
   - Perform **exploratory data analysis (EDA)**:
     - **Visualizations** (histograms, box plots, correlations).
     - **Feature importance ranking**.

---

#### 2. Predictive Modeling for Churn
✅ Select at least **two machine learning models**:
   - Logistic Regression (Baseline).
   - Random Forest / XGBoost (for better performance).

✅ **Feature Engineering**:
   - Convert categorical variables using **One-Hot Encoding**.
   - Handle **imbalanced data** (SMOTE / oversampling).
   - Use **feature selection techniques** (SHAP values, mutual information).

✅ **Model Training & Evaluation**:
   - Train models on historical churn data.
   - Compare **accuracy, precision-recall, F1-score, AUC-ROC**.
   - Use **Hyperparameter tuning** for optimization.

✅ **Insights**:
   - Identify **top factors contributing to churn**.

---

#### 3. NLP for Customer Feedback Analysis
✅ **Data Preprocessing**:
   - Convert textual feedback into **structured data**.
   - Remove **stop words, lemmatization, stemming**.

✅ **Sentiment Analysis**:
   - Use **VADER** or **TextBlob** for sentiment scoring.
   - Identify **common customer complaints**.

✅ **Topic Modeling**:
   - Apply **LDA (Latent Dirichlet Allocation)** to group customer concerns.

✅ **Key Insights Extraction**:
   - Map sentiment trends to **churn behavior**.

---

#### 4. Generative AI for Retention Strategies
✅ **Develop Personalized Retention Strategies**:
   - Use insights from churn models and NLP analysis.
   - Develop **targeted retention plans** (discounts, loyalty programs).

✅ **Chatbot Integration**:
   - Build a **Generative AI chatbot** using **LangChain + Hugging Face**.
   - Implement **multi-turn conversation** for handling customer complaints.

✅ **Example Chatbot Logic**:
   - **User Query**: *"My card keeps getting blocked"*
   - **Response**: *"I understand your issue. Would you like me to escalate this to the Debit Card team?"*

✅ **Evaluation & Refinement**:
   - Assess chatbot responses using **human feedback**.
   - Implement **automated learning from interactions**.

---

#### 5. System Integration & Deployment
✅ **Architecture Design**:
   - **MySQL for data storage**.
   - **Colab for model training & evaluation**.
   - **FastAPI for serving predictions & chatbot interactions**.
   - **Streamlit / Flask for UI (if needed for visualization)**.

✅ **Deployment Plan**:
   - Choose **Google Cloud / AWS for cloud-based deployment**.
   - Implement **real-time data updates**.

✅ **Scalability Considerations**:
   - Optimize **database queries & indexing**.
   - Use **batch processing for large data handling**.

---

#### 6. Ethical Considerations & Privacy
✅ **Fairness & Bias Mitigation**:
   - Ensure models **don’t discriminate based on sensitive attributes**.
   - Regularly audit **feature importance**.

✅ **Customer Privacy**:
   - Implement **data encryption** and **GDPR compliance**.

✅ **Transparent AI**:
   - Provide **explainability reports** for stakeholders.

---

### Deliverables
📌 **Colab Notebooks**: End-to-end implementation.  
📌 **Python Scripts**: For final model deployment.  
📌 **Presentation (10 Slides)**: Summary, findings, recommendations.  
📌 **Requirements.txt**: List of libraries used.  

---

### Next Steps
1️⃣ **Upload data to MySQL and verify schema.**  
2️⃣ **Connect MySQL to Google Colab & perform EDA.**  
3️⃣ **Train churn prediction models and evaluate.**  
4️⃣ **Implement NLP for feedback analysis.**  
5️⃣ **Develop chatbot and test retention strategies.**  
6️⃣ **Integrate all components and deploy.**  

"#;

/// Height of the title cell in millimeters.
const TITLE_CELL_HEIGHT_MM: f64 = 10.0;
/// Extra vertical spacing after the title, in millimeters.
const TITLE_SPACING_MM: f64 = 10.0;

/// Generator configuration. `Default` reproduces the original
/// document; every knob the original hardcoded is exposed here.
#[derive(Debug, Clone)]
pub struct PlanConfig {
    /// Where the PDF is written.
    pub output_path: PathBuf,
    /// Bottom margin for automatic page breaks, in millimeters.
    pub break_margin: f64,
    pub title_family: String,
    pub title_size: f64,
    pub title_bold: bool,
    pub title_align: Align,
    pub body_family: String,
    pub body_size: f64,
    /// Height of each body line cell, in millimeters.
    pub line_height: f64,
    /// Compress page content streams.
    pub compress: bool,
}

impl Default for PlanConfig {
    fn default() -> Self {
        PlanConfig {
            output_path: PathBuf::from("Churn_Prediction_Project_Plan.pdf"),
            break_margin: 15.0,
            title_family: "Arial".to_string(),
            title_size: 16.0,
            title_bold: true,
            title_align: Align::Center,
            body_family: "Arial".to_string(),
            body_size: 12.0,
            line_height: 7.0,
            compress: false,
        }
    }
}

impl PlanConfig {
    fn title_font(&self) -> Result<Font> {
        Font::from_family(&self.title_family, self.title_bold)
            .ok_or_else(|| Error::UnknownFont(self.title_family.clone()))
    }

    fn body_font(&self) -> Result<Font> {
        Font::from_family(&self.body_family, false)
            .ok_or_else(|| Error::UnknownFont(self.body_family.clone()))
    }
}

/// Render the plan into any `Write` target and return it.
///
/// Title first, then each body segment through a full-width
/// auto-wrapping cell; pagination is left entirely to the composer's
/// automatic page breaking.
pub fn write_plan<W: Write>(config: &PlanConfig, writer: W) -> Result<W> {
    let title_font = config.title_font()?;
    let body_font = config.body_font()?;

    let mut composer = Composer::new(writer)?;
    composer.set_compression(config.compress);
    composer.set_info("Title", PLAN_TITLE);
    composer.set_auto_page_break(true, config.break_margin);
    composer.add_page()?;

    composer.set_font(title_font, config.title_size);
    composer.cell(0.0, TITLE_CELL_HEIGHT_MM, PLAN_TITLE, true, config.title_align)?;
    composer.line_break(TITLE_SPACING_MM);

    for line in PLAN_BODY.split('\n') {
        composer.set_font(body_font, config.body_size);
        composer.multi_cell(0.0, config.line_height, line)?;
    }

    info!("rendered {} pages", composer.page_count());
    composer.finish()
}

/// Render the plan to `config.output_path` and return the path
/// written. A missing or unwritable directory surfaces as an I/O
/// error; nothing is retried or cleaned up.
pub fn write_plan_file(config: &PlanConfig) -> Result<PathBuf> {
    let file = File::create(&config.output_path)?;
    let mut writer = write_plan(config, BufWriter::new(file))?;
    writer.flush()?;
    info!("wrote {}", config.output_path.display());
    Ok(config.output_path.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_segment_count_is_fixed() {
        // 127 line breaks in the payload, so 128 segments.
        assert_eq!(PLAN_BODY.split('\n').count(), 128);
    }

    #[test]
    fn body_starts_and_ends_with_blank_segments() {
        let segments: Vec<&str> = PLAN_BODY.split('\n').collect();
        assert_eq!(segments[0], "");
        assert_eq!(segments[1], "");
        assert_eq!(segments[segments.len() - 1], "");
    }

    #[test]
    fn default_config_matches_the_original_document() {
        let config = PlanConfig::default();
        assert_eq!(config.break_margin, 15.0);
        assert_eq!(config.title_size, 16.0);
        assert!(config.title_bold);
        assert_eq!(config.title_align, Align::Center);
        assert_eq!(config.body_size, 12.0);
        assert_eq!(config.line_height, 7.0);
        assert!(!config.compress);
    }

    #[test]
    fn unknown_family_is_rejected() {
        let config = PlanConfig {
            title_family: "Wingdings".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.title_font(), Err(Error::UnknownFont(_))));
    }
}
