use iced::widget::image::Handle;
use iced::widget::{button, column, container, image as image_widget, row, scrollable, text, Column};
use iced::{Alignment, Element, Event, Length, Subscription, Task, Theme};
use rfd::FileDialog;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

// Declare the application modules
mod api;
mod camera;
mod config;
mod state;
mod ui;

use api::client::AnalysisClient;
use api::error::AnalyzeError;
use api::model::FoodResult;
use camera::CameraSession;
use config::AppConfig;
use state::image::{display_name, mime_for_path, AcquireError, CapturedImage, SUPPORTED_EXTENSIONS};
use state::workflow::{AnalysisPhase, Workflow};

/// How often the camera overlay polls for a fresh preview frame
const CAMERA_PREVIEW_INTERVAL: Duration = Duration::from_millis(100);

/// Main application state
struct FoodAnalyzer {
    /// Endpoint, timeout and camera settings
    config: AppConfig,
    /// The analysis workflow state machine
    workflow: Workflow,
    /// HTTP client for the analysis service
    client: AnalysisClient,
    /// Active camera session, if the camera overlay is open
    camera: Option<CameraSession>,
    /// Newest camera preview frame
    camera_preview: Option<Handle>,
    /// Whether a file is currently hovering over the window
    drag_active: bool,
    /// Status message to display to the user
    status: String,
}

/// Application messages (events)
#[derive(Debug, Clone)]
enum Message {
    /// User clicked "Browse Files"
    PickImage,
    /// A file is hovering over the window
    DragEntered,
    /// The hovering file left the window
    DragLeft,
    /// A file was dropped onto the window
    FileDropped(PathBuf),
    /// Background file read finished
    ImageLoaded(Result<CapturedImage, AcquireError>),
    /// User removed the selected image
    RemoveImage,
    /// User clicked "Take Photo"
    OpenCamera,
    /// User closed the camera overlay
    CloseCamera,
    /// Timer tick while the camera overlay is open
    CameraTick,
    /// User clicked "Capture"
    CapturePhoto,
    /// User clicked "Analyze Food" (or "Retry Analysis")
    Analyze,
    /// The analysis request resolved
    AnalysisDone(Result<Vec<FoodResult>, AnalyzeError>),
    /// Startup reachability probe resolved
    HealthChecked(bool),
}

impl FoodAnalyzer {
    /// Create a new instance of the application
    fn new() -> (Self, Task<Message>) {
        let config = AppConfig::load().unwrap_or_else(|err| {
            warn!("falling back to default configuration: {err}");
            AppConfig::default()
        });

        info!("analysis endpoint: {}", config.endpoint);

        // If this fails, we panic because the app cannot function without
        // its HTTP client
        let client = AnalysisClient::new(&config).expect("Failed to initialize HTTP client");

        let app = FoodAnalyzer {
            config,
            workflow: Workflow::new(),
            client: client.clone(),
            camera: None,
            camera_preview: None,
            drag_active: false,
            status: "Drop a food photo to get started.".to_string(),
        };

        let probe = Task::perform(async move { client.health().await }, Message::HealthChecked);

        (app, probe)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::PickImage => {
                // Show the native file picker dialog
                let file = FileDialog::new()
                    .set_title("Select a Food Photo")
                    .add_filter("Images", SUPPORTED_EXTENSIONS)
                    .pick_file();

                if let Some(path) = file {
                    return Task::perform(load_image(path), Message::ImageLoaded);
                }

                Task::none()
            }
            Message::DragEntered => {
                self.drag_active = true;
                Task::none()
            }
            Message::DragLeft => {
                self.drag_active = false;
                Task::none()
            }
            Message::FileDropped(path) => {
                self.drag_active = false;

                // Validate the declared type before touching the disk;
                // an invalid drop changes nothing else
                if mime_for_path(&path).is_none() {
                    let name = display_name(&path);
                    warn!("rejected drop: {name}");
                    self.status = format!("{name} is not an image file. Please choose an image.");
                    return Task::none();
                }

                Task::perform(load_image(path), Message::ImageLoaded)
            }
            Message::ImageLoaded(Ok(image)) => {
                info!("selected {} ({} bytes)", image.file_name, image.bytes.len());
                self.workflow.select_image(image);
                self.status = "Image loaded. Click Analyze Food to process it.".to_string();
                Task::none()
            }
            Message::ImageLoaded(Err(err)) => {
                warn!("image acquisition failed: {err}");
                self.status = err.to_string();
                Task::none()
            }
            Message::RemoveImage => {
                self.workflow.clear();
                self.status = "Drop a food photo to get started.".to_string();
                Task::none()
            }
            Message::OpenCamera => {
                // Replacing any previous session stops it and frees the device
                self.camera_preview = None;
                self.camera = Some(CameraSession::start(self.config.camera_index));
                self.status = "Opening camera...".to_string();
                Task::none()
            }
            Message::CloseCamera => {
                self.camera = None;
                self.camera_preview = None;
                self.status = "Camera closed.".to_string();
                Task::none()
            }
            Message::CameraTick => {
                if let Some(session) = &self.camera {
                    if let Some(err) = session.take_error() {
                        warn!("camera failed: {err}");
                        self.status = err.to_string();
                        self.camera = None;
                        self.camera_preview = None;
                    } else if let Some(frame) = session.latest_frame() {
                        // Replacing the handle drops the previous frame
                        self.camera_preview = Some(Handle::from_bytes(frame));
                    }
                }
                Task::none()
            }
            Message::CapturePhoto => {
                if let Some(session) = &self.camera {
                    match session.capture() {
                        Some(image) => {
                            info!("captured {}", image.file_name);
                            self.workflow.select_image(image);
                            self.camera = None;
                            self.camera_preview = None;
                            self.status =
                                "Photo captured. Click Analyze Food to process it.".to_string();
                        }
                        None => {
                            self.status = "No camera frame available yet.".to_string();
                        }
                    }
                }
                Task::none()
            }
            Message::Analyze => match self.workflow.begin_analysis() {
                Ok(image) => {
                    self.status = "Analyzing your food...".to_string();
                    let client = self.client.clone();

                    Task::perform(
                        async move { client.analyze(image).await },
                        Message::AnalysisDone,
                    )
                }
                Err(err) => {
                    warn!("analysis not started: {err}");
                    self.status = err.to_string();
                    Task::none()
                }
            },
            Message::AnalysisDone(Ok(results)) => {
                info!("analysis returned {} result(s)", results.len());
                self.workflow.complete(results);
                self.status = "Analysis complete.".to_string();
                Task::none()
            }
            Message::AnalysisDone(Err(err)) => {
                warn!("analysis failed: {err}");
                self.workflow.fail(err);
                self.status = "Analysis failed.".to_string();
                Task::none()
            }
            Message::HealthChecked(reachable) => {
                self.status = if reachable {
                    "Connected to the analysis backend.".to_string()
                } else {
                    "Analysis backend is unreachable. Check that it is running.".to_string()
                };
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<Message> {
        // The camera overlay takes over the whole window while open
        if self.camera.is_some() {
            return ui::camera::view(self.camera_preview.as_ref());
        }

        let mut content: Column<Message> = column![
            text("Food Analyzer").size(40),
            ui::dropzone::view(self.drag_active),
        ]
        .spacing(20)
        .padding(40)
        .align_x(Alignment::Center)
        .width(Length::Fill);

        if let Some(image) = self.workflow.image() {
            let analyzing = self.workflow.is_analyzing();

            // The trigger is disabled while a request is in flight
            let analyze = button(text(if analyzing { "Analyzing..." } else { "Analyze Food" }))
                .on_press_maybe((!analyzing).then_some(Message::Analyze))
                .padding(10);
            let remove = button("Remove").on_press(Message::RemoveImage).padding(10);

            content = content.push(
                column![
                    image_widget(image.preview.clone()).width(Length::Fixed(360.0)),
                    row![analyze, remove].spacing(12),
                ]
                .spacing(12)
                .align_x(Alignment::Center),
            );
        }

        match self.workflow.phase() {
            AnalysisPhase::Analyzing => {
                content = content.push(text("Analyzing your food...").size(16));
            }
            AnalysisPhase::Failed(error) => {
                content = content.push(
                    container(
                        column![
                            text("Error analyzing food").size(18),
                            text(error.to_string()).size(14),
                            button("Retry Analysis").on_press(Message::Analyze).padding(8),
                        ]
                        .spacing(8)
                        .align_x(Alignment::Center),
                    )
                    .padding(16)
                    .style(container::bordered_box),
                );
            }
            AnalysisPhase::Succeeded(results) => {
                content = content.push(ui::results::view(results));
            }
            AnalysisPhase::Idle | AnalysisPhase::ImageSelected => {}
        }

        content = content.push(text(&self.status).size(14));

        container(scrollable(content))
            .width(Length::Fill)
            .height(Length::Fill)
            .center_x(Length::Fill)
            .into()
    }

    /// Window events (file drag-and-drop) plus the camera preview timer
    fn subscription(&self) -> Subscription<Message> {
        let window_events = iced::event::listen_with(|event, _status, _window| match event {
            Event::Window(iced::window::Event::FileHovered(_)) => Some(Message::DragEntered),
            Event::Window(iced::window::Event::FilesHoveredLeft) => Some(Message::DragLeft),
            Event::Window(iced::window::Event::FileDropped(path)) => {
                Some(Message::FileDropped(path))
            }
            _ => None,
        });

        if self.camera.is_some() {
            Subscription::batch([
                window_events,
                iced::time::every(CAMERA_PREVIEW_INTERVAL).map(|_| Message::CameraTick),
            ])
        } else {
            window_events
        }
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }
}

fn main() -> iced::Result {
    tracing_subscriber::fmt::init();

    iced::application("Food Analyzer", FoodAnalyzer::update, FoodAnalyzer::view)
        .subscription(FoodAnalyzer::subscription)
        .theme(FoodAnalyzer::theme)
        .centered()
        .run_with(FoodAnalyzer::new)
}

/// Read a picked or dropped file and turn it into a `CapturedImage`.
/// Runs off the UI thread; the result comes back as a message.
async fn load_image(path: PathBuf) -> Result<CapturedImage, AcquireError> {
    match tokio::fs::read(&path).await {
        Ok(bytes) => CapturedImage::from_file(&path, bytes),
        Err(err) => Err(AcquireError::Unreadable {
            file_name: display_name(&path),
            message: err.to_string(),
        }),
    }
}
